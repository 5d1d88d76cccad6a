mod api;
pub mod prompts;
mod service;

pub use api::{normalize_model, LlmApiClient};
pub use prompts::{BuiltPrompt, SummaryLength};
pub use service::{CompletionRequest, CompletionResult, CompletionService};
