//! Line-oriented command surface
//!
//! Each input line is one of `question: <text>`, `tips: [topic]`,
//! `summarize: <text>` or `exit`. Prefixes are case-insensitive.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::agent::QueryAgent;
use crate::error::Result;
use crate::llm::SummaryLength;

const PROMPT: &str = "How can I help you? (e.g., 'question: What is photosynthesis?', 'tips: history', 'summarize: [text]')";
const INVALID_COMMAND: &str =
    "Invalid command. Please use 'question:', 'tips:', or 'summarize:'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Question(String),
    Tips(Option<String>),
    Summarize(String),
    Exit,
    Invalid,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line.eq_ignore_ascii_case("exit") {
            return Command::Exit;
        }

        if let Some(question) = strip_prefix_ignore_case(line, "question:") {
            return Command::Question(question.trim().to_string());
        }

        if let Some(topic) = strip_prefix_ignore_case(line, "tips:") {
            let topic = topic.trim();
            return Command::Tips((!topic.is_empty()).then(|| topic.to_string()));
        }

        if let Some(text) = strip_prefix_ignore_case(line, "summarize:") {
            return Command::Summarize(text.trim().to_string());
        }

        Command::Invalid
    }
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// Runs commands against a [`QueryAgent`] and writes the results to `out`.
pub struct Session<'a> {
    agent: &'a QueryAgent,
    summary_length: SummaryLength,
}

impl<'a> Session<'a> {
    pub fn new(agent: &'a QueryAgent, summary_length: SummaryLength) -> Self {
        Self {
            agent,
            summary_length,
        }
    }

    pub async fn execute<W: Write>(&self, command: Command, out: &mut W) -> Result<Step> {
        match command {
            Command::Exit => {
                writeln!(out, "Goodbye!")?;
                return Ok(Step::Exit);
            }
            Command::Question(question) => {
                if question.is_empty() {
                    writeln!(out, "Please provide a question to answer.")?;
                    return Ok(Step::Continue);
                }
                tracing::debug!("Answering question");
                writeln!(out, "\nAgent's Answer:")?;
                writeln!(out, "{}", self.agent.answer_question(&question).await)?;
            }
            Command::Tips(topic) => {
                match &topic {
                    Some(topic) => {
                        writeln!(out, "\nAgent's Study Tips for {}:", capitalize(topic))?
                    }
                    None => writeln!(out, "\nAgent's General Study Tips:")?,
                }
                writeln!(out, "{}", self.agent.provide_study_tips(topic.as_deref()).await)?;
            }
            Command::Summarize(text) => {
                if text.is_empty() {
                    writeln!(out, "Please provide text to summarize.")?;
                    return Ok(Step::Continue);
                }
                tracing::debug!(length = %self.summary_length, "Summarizing text");
                writeln!(out, "\nAgent's Summary ({}):", self.summary_length)?;
                writeln!(
                    out,
                    "{}",
                    self.agent.summarize_text(&text, self.summary_length).await
                )?;
            }
            Command::Invalid => writeln!(out, "{INVALID_COMMAND}")?,
        }

        Ok(Step::Continue)
    }

    /// Read commands line by line until `exit` or end of input.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Welcome to Scholar, your academic assistant!")?;
        writeln!(
            out,
            "You can ask academic questions, get study tips, or summarize text."
        )?;
        writeln!(out, "Type 'exit' to quit.")?;

        let mut lines = input.lines();
        loop {
            write!(out, "\n{PROMPT}\n> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                writeln!(out, "Goodbye!")?;
                break;
            };

            if self.execute(Command::parse(&line), out).await? == Step::Exit {
                break;
            }
        }

        Ok(())
    }
}
