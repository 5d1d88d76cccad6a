use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{Result, ScholarError},
    llm::service::{CompletionRequest, CompletionResult, CompletionService},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

/// OpenAI-compatible chat completion client. Each call is a single round trip.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    base_url: String,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let (provider, _) = parse_llm_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());

        if needs_api_key && api_key.is_none() {
            return Err(ScholarError::Configuration(
                "API key required for this provider".to_string(),
            ));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url.clone())
            .with_api_key(api_key.unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ScholarError::Configuration(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // async-openai retries 429/5xx internally until max_elapsed_time runs out.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat completion and return the raw message content.
    pub async fn complete_request(&self, request: &CompletionRequest) -> Result<String> {
        if request.user_prompt.trim().is_empty() {
            return Err(ScholarError::Validation(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let chat_request = Self::build_request(request)?;

        tracing::debug!(
            model = %chat_request.model,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "Sending chat completion request"
        );

        match self.client.chat().create(chat_request).await {
            Ok(response) => {
                let content = Self::extract_content(response)?;
                tracing::debug!(response_len = content.len(), "LLM response received");
                Ok(content)
            }
            Err(error) => {
                if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                    return Err(rate_limit_error);
                }

                if let Some(auth_error) = Self::auth_error(&error) {
                    return Err(auth_error);
                }

                Err(Self::map_openai_error(error))
            }
        }
    }

    fn build_request(request: &CompletionRequest) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if !request.system_instruction.trim().is_empty() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(request.system_instruction.as_str())
                    .build()
                    .map_err(|error| {
                        ScholarError::Validation(format!("Invalid system instruction: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt.as_str())
                .build()
                .map_err(|error| {
                    ScholarError::Validation(format!("Invalid user prompt: {error}"))
                })?
                .into(),
        );

        CreateChatCompletionRequestArgs::default()
            .model(normalize_model(&request.model_id))
            .messages(messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
            .map_err(|error| {
                ScholarError::Validation(format!("Invalid LLM completion request: {error}"))
            })
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScholarError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| ScholarError::Llm("LLM response contained no content".to_string()))
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<ScholarError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(ScholarError::LlmRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(ScholarError::LlmRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<ScholarError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(ScholarError::LlmAuth(reqwest_error.to_string()))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => {
                Some(ScholarError::LlmAuth(api_error.to_string()))
            }
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("forbidden")
            || message.contains("authentication")
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || code.contains("authentication")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> ScholarError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => ScholarError::Llm(reqwest_error.to_string()),
            OpenAIError::ApiError(api_error) => ScholarError::Llm(api_error.to_string()),
            OpenAIError::JSONDeserialize(err) => {
                ScholarError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => ScholarError::Validation(message),
            other => ScholarError::Llm(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionService for LlmApiClient {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult {
        let result = self.complete_request(request).await;
        if let Err(error) = &result {
            tracing::warn!(error = %error, "Chat completion failed");
        }
        result.into()
    }
}

/// Strip a known provider prefix so the endpoint sees its own model name.
pub fn normalize_model(model_id: &str) -> String {
    let (provider, model) = parse_llm_provider_model(model_id);
    if provider.eq_ignore_ascii_case("local") {
        model_id.to_string()
    } else {
        model.to_string()
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}
