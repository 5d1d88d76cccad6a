use std::sync::Arc;

use crate::config::{is_valid_temperature, validate_api_key, AgentConfig, Config};
use crate::error::{Result, ScholarError};
use crate::llm::prompts::{question_prompt, study_tips_prompt, summary_prompt};
use crate::llm::{
    BuiltPrompt, CompletionRequest, CompletionResult, CompletionService, LlmApiClient,
    SummaryLength,
};

const FAILURE_PREFIX: &str = "An error occurred while generating response: ";

/// Render a failed completion as the text shown to the user.
pub fn render_failure(message: &str) -> String {
    format!("{FAILURE_PREFIX}{message}")
}

/// Answers questions, suggests study tips and summarizes text by sending
/// templated prompts to a [`CompletionService`].
#[derive(Clone)]
pub struct QueryAgent {
    config: Arc<AgentConfig>,
    service: Arc<dyn CompletionService>,
}

impl QueryAgent {
    /// Fails with a configuration error when `api_key` is blank or a placeholder,
    /// or when the default temperature is outside `[0, 1]`.
    pub fn new(
        config: AgentConfig,
        api_key: &str,
        service: Arc<dyn CompletionService>,
    ) -> Result<Self> {
        validate_api_key(Some(api_key))?;

        if !is_valid_temperature(config.default_temperature) {
            return Err(ScholarError::Configuration(format!(
                "Default temperature {} is outside [0, 1]",
                config.default_temperature
            )));
        }

        Ok(Self {
            config: Arc::new(config),
            service,
        })
    }

    /// Build an agent backed by the OpenAI-compatible HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = validate_api_key(config.llm.api_key.as_deref())?;

        tracing::info!("Initializing LLM client: {}...", config.llm.model);
        let client = LlmApiClient::new(&config.llm)?;

        Self::new(config.agent.clone(), api_key, Arc::new(client))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn check_limits(max_tokens: u32, temperature: f32) -> Result<()> {
        if max_tokens == 0 {
            return Err(ScholarError::InvalidInput(
                "max_tokens must be positive".to_string(),
            ));
        }
        if !is_valid_temperature(temperature) {
            return Err(ScholarError::InvalidInput(format!(
                "temperature {temperature} is outside [0, 1]"
            )));
        }
        Ok(())
    }

    fn request(&self, prompt: &str, max_tokens: u32, temperature: f32) -> CompletionRequest {
        CompletionRequest {
            model_id: self.config.model_id.clone(),
            system_instruction: self.config.system_instruction.clone(),
            user_prompt: prompt.to_string(),
            max_tokens,
            temperature,
        }
    }

    /// Send one prompt and return the structured outcome, trimming successful text.
    ///
    /// A zero token budget or a temperature outside `[0, 1]` fails without
    /// calling the service.
    pub async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> CompletionResult {
        if let Err(error) = Self::check_limits(max_tokens, temperature) {
            tracing::warn!("Rejected completion request: {}", error);
            return CompletionResult::failure(error.to_string());
        }

        let request = self.request(prompt, max_tokens, temperature);

        match self.service.complete(&request).await {
            CompletionResult::Success { text } => {
                tracing::debug!(response_len = text.len(), "Completion succeeded");
                CompletionResult::Success {
                    text: text.trim().to_string(),
                }
            }
            CompletionResult::Failure { message } => {
                tracing::warn!("Completion failed: {}", message);
                CompletionResult::Failure { message }
            }
        }
    }

    /// Like [`complete`](Self::complete), but failures come back as display text.
    pub async fn query(&self, prompt: &str, max_tokens: u32, temperature: f32) -> String {
        match self.complete(prompt, max_tokens, temperature).await {
            CompletionResult::Success { text } => text,
            CompletionResult::Failure { message } => render_failure(&message),
        }
    }

    pub async fn query_default(&self, prompt: &str, max_tokens: u32) -> String {
        self.query(prompt, max_tokens, self.config.default_temperature).await
    }

    async fn send(&self, prompt: BuiltPrompt) -> String {
        self.query_default(&prompt.text, prompt.max_tokens).await
    }

    pub async fn answer_question(&self, question: &str) -> String {
        match question_prompt(question) {
            Ok(prompt) => self.send(prompt).await,
            Err(error) => render_failure(&error.to_string()),
        }
    }

    pub async fn provide_study_tips(&self, topic: Option<&str>) -> String {
        self.send(study_tips_prompt(topic)).await
    }

    /// Summarize `text`. Blank text is sent as-is; callers validate it first.
    pub async fn summarize_text(&self, text: &str, length: SummaryLength) -> String {
        self.send(summary_prompt(text, length)).await
    }
}
