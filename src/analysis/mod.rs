//! Text-processing operations behind `POST /api/analyses`.

use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No text provided")]
    EmptyText,

    #[error("Input is not text: {0}")]
    NotText(String),

    #[error("Operation not supported by this analyzer: {0}")]
    Unsupported(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

/// Operations a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Sentiment,
    Summary,
    Keywords,
    Entities,
    Classify,
    Chat,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sentiment => "sentiment",
            Operation::Summary => "summary",
            Operation::Keywords => "keywords",
            Operation::Entities => "entities",
            Operation::Classify => "classify",
            Operation::Chat => "chat",
        }
    }
}

impl FromStr for Operation {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentiment" => Ok(Operation::Sentiment),
            "summary" => Ok(Operation::Summary),
            "keywords" => Ok(Operation::Keywords),
            "entities" => Ok(Operation::Entities),
            "classify" => Ok(Operation::Classify),
            "chat" => Ok(Operation::Chat),
            other => Err(AnalysisError::UnknownOperation(other.to_string())),
        }
    }
}

/// Runs one operation over a piece of text and returns a JSON result.
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, operation: &str) -> Result<Value, AnalysisError>;
}

pub const CHAT_REPLY: &str =
    "Thanks for your message! A more advanced version of this app could call a large language model here.";

/// String heuristics only. Sentiment, keyword and entity extraction need a
/// language model and are reported as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAnalyzer;

impl TextAnalyzer for BasicAnalyzer {
    fn analyze(&self, text: &str, operation: &str) -> Result<Value, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyText);
        }

        match operation.parse::<Operation>()? {
            Operation::Summary => Ok(json!({ "summary": summarize(text, 2) })),
            Operation::Classify => Ok(json!({ "label": classify(text) })),
            Operation::Chat => Ok(json!({ "reply": CHAT_REPLY })),
            unsupported @ (Operation::Sentiment | Operation::Keywords | Operation::Entities) => {
                Err(AnalysisError::Unsupported(unsupported.as_str().to_string()))
            }
        }
    }
}

/// Split after `.`, `!` or `?` when followed by whitespace.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut previous: Option<char> = None;
    let mut in_break = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if !in_break && matches!(previous, Some('.' | '!' | '?')) {
                out.push(&text[start..idx]);
                in_break = true;
            }
        } else if in_break {
            start = idx;
            in_break = false;
        }
        previous = Some(ch);
    }

    if !in_break {
        out.push(&text[start..]);
    }
    out.into_iter().filter(|s| !s.trim().is_empty()).collect()
}

pub fn summarize(text: &str, max_sentences: usize) -> String {
    sentences(text)
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn classify(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    if contains_any(&lower, &["error", "bug"]) {
        "bug report"
    } else if contains_any(&lower, &["great", "love"]) {
        "praise"
    } else if contains_any(&lower, &["refund", "angry", "upset"]) {
        "complaint"
    } else {
        "other"
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
