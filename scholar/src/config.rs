use serde::Deserialize;
use std::env;

use crate::error::{Result, ScholarError};

/// System instruction sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful academic assistant.";

pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Value shipped in sample configuration in place of a real key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENAI_API_KEY";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read the first of `vars` that is set to a non-empty value.
fn first_env(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| env::var(var).ok())
        .find(|val| !val.trim().is_empty())
}

fn parse_temperature(var: &str) -> f32 {
    let temperature = parse_env_or(var, DEFAULT_TEMPERATURE);
    if is_valid_temperature(temperature) {
        temperature
    } else {
        tracing::warn!(
            "Temperature {} for {} is outside [0, 1]. Using default.",
            temperature,
            var
        );
        DEFAULT_TEMPERATURE
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn parse_timeout(var: &str) -> u64 {
    match parse_env_or(var, DEFAULT_TIMEOUT_SECS) {
        0 => {
            tracing::warn!("Timeout for {} must be positive. Using default.", var);
            DEFAULT_TIMEOUT_SECS
        }
        secs => secs,
    }
}

/// Whether `temperature` is a usable sampling temperature.
pub fn is_valid_temperature(temperature: f32) -> bool {
    (0.0..=1.0).contains(&temperature)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub agent: AgentConfig,
    pub llm: LlmConfig,
}

/// Settings owned by the query agent for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentConfig {
    pub model_id: String,
    pub system_instruction: String,
    pub default_temperature: f32,
}

impl AgentConfig {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            default_temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Transport settings for the chat completion endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self {
            agent: AgentConfig {
                model_id: model.clone(),
                system_instruction: SYSTEM_INSTRUCTION.to_string(),
                default_temperature: parse_temperature("LLM_TEMPERATURE"),
            },
            llm: LlmConfig {
                model,
                api_key: first_env(&["LLM_API_KEY", "OPENAI_API_KEY"]),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_timeout("LLM_TIMEOUT"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Point both the agent and the transport at another model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.agent.model_id = model.clone();
        self.llm.model = model;
        self
    }
}

/// Reject credentials that cannot possibly authenticate.
pub fn validate_api_key(api_key: Option<&str>) -> Result<&str> {
    match api_key.map(str::trim) {
        None | Some("") => Err(ScholarError::Configuration(
            "API key is not set. Set LLM_API_KEY or OPENAI_API_KEY in the environment or a .env file"
                .to_string(),
        )),
        Some(PLACEHOLDER_API_KEY) => Err(ScholarError::Configuration(format!(
            "API key is still the placeholder '{PLACEHOLDER_API_KEY}'. Replace it with your actual key"
        ))),
        Some(key) => Ok(key),
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
