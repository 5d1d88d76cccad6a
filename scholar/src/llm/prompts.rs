//! Fixed prompt templates for the assistant's commands
//!
//! Each builder returns the finished prompt together with the token budget
//! the command is allowed to spend. The mapping is pure: the same inputs
//! always produce the same prompt and budget.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScholarError};

pub const QUESTION_MAX_TOKENS: u32 = 300;
pub const STUDY_TIPS_MAX_TOKENS: u32 = 200;

/// A prompt ready to be sent, with its response budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub text: String,
    pub max_tokens: u32,
}

impl BuiltPrompt {
    fn new(text: String, max_tokens: u32) -> Self {
        Self { text, max_tokens }
    }
}

/// How long a summary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    #[default]
    Brief,
    Medium,
    Detailed,
    /// Any selector that is not one of the above.
    Other,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Brief => "brief",
            SummaryLength::Medium => "medium",
            SummaryLength::Detailed => "detailed",
            SummaryLength::Other => "default",
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            SummaryLength::Brief => 80,
            SummaryLength::Medium => 150,
            SummaryLength::Detailed => 300,
            SummaryLength::Other => 100,
        }
    }
}

impl FromStr for SummaryLength {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "brief" | "briefly" => SummaryLength::Brief,
            "medium" => SummaryLength::Medium,
            "detailed" => SummaryLength::Detailed,
            _ => SummaryLength::Other,
        })
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a prompt for answering an academic question
///
/// # Errors
/// Returns [`ScholarError::InvalidInput`] when the question is blank.
///
/// # Example
/// ```
/// use scholar::llm::prompts::question_prompt;
///
/// let prompt = question_prompt("What is photosynthesis?").unwrap();
/// assert!(prompt.text.ends_with("What is photosynthesis?"));
/// assert_eq!(prompt.max_tokens, 300);
/// ```
pub fn question_prompt(question: &str) -> Result<BuiltPrompt> {
    if question.trim().is_empty() {
        return Err(ScholarError::InvalidInput(
            "Question cannot be empty".to_string(),
        ));
    }

    Ok(BuiltPrompt::new(
        format!("Answer the following academic question concisely and accurately: {question}"),
        QUESTION_MAX_TOKENS,
    ))
}

/// Generate a prompt asking for five study tips
///
/// A blank or missing topic falls back to general tips for students.
///
/// # Example
/// ```
/// use scholar::llm::prompts::study_tips_prompt;
///
/// let prompt = study_tips_prompt(Some("biology"));
/// assert!(prompt.text.contains("biology"));
/// assert_eq!(prompt.max_tokens, 200);
/// ```
pub fn study_tips_prompt(topic: Option<&str>) -> BuiltPrompt {
    let text = match topic.filter(|topic| !topic.trim().is_empty()) {
        Some(topic) => format!("Provide 5 effective study tips for learning about {topic}."),
        None => "Provide 5 general effective study tips for students.".to_string(),
    };

    BuiltPrompt::new(text, STUDY_TIPS_MAX_TOKENS)
}

/// Generate a prompt for summarizing text at the requested length
///
/// The text is not validated here; blank input is the caller's concern.
///
/// # Example
/// ```
/// use scholar::llm::prompts::{summary_prompt, SummaryLength};
///
/// let prompt = summary_prompt("The sky is blue.", SummaryLength::Detailed);
/// assert!(prompt.text.starts_with("Provide a detailed summary"));
/// assert_eq!(prompt.max_tokens, 300);
/// ```
pub fn summary_prompt(text: &str, length: SummaryLength) -> BuiltPrompt {
    let prompt = match length {
        SummaryLength::Brief => {
            format!("Summarize the following text in one to two sentences: {text}")
        }
        SummaryLength::Medium => format!("Summarize the following text in a paragraph: {text}"),
        SummaryLength::Detailed => {
            format!("Provide a detailed summary of the following text: {text}")
        }
        SummaryLength::Other => format!("Summarize the following text: {text}"),
    };

    BuiltPrompt::new(prompt, length.max_tokens())
}
