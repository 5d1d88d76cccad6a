use async_trait::async_trait;

use crate::error::ScholarError;

/// One chat completion call, fully determined before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model_id: String,
    pub system_instruction: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Outcome of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    Success { text: String },
    Failure { message: String },
}

impl CompletionResult {
    pub fn success(text: impl Into<String>) -> Self {
        CompletionResult::Success { text: text.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        CompletionResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success { .. })
    }
}

impl From<std::result::Result<String, ScholarError>> for CompletionResult {
    fn from(result: std::result::Result<String, ScholarError>) -> Self {
        match result {
            Ok(text) => CompletionResult::Success { text },
            Err(error) => CompletionResult::Failure {
                message: error.to_string(),
            },
        }
    }
}

/// Anything that can turn a [`CompletionRequest`] into generated text.
///
/// Implementations report every failure as [`CompletionResult::Failure`]
/// instead of returning an error.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult;
}
