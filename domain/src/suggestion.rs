//! Teaching suggestions generated from a conversation's history.
//!
//! Generation never fails from the caller's point of view: rate limits are waited out
//! through `tutor_ai::generate_with_retry`, and anything that still goes wrong is
//! replaced by `Suggestion::fallback()`. The outcome records which path was taken.

use crate::error::Error;
use log::*;
use std::sync::Arc;
use tutor_ai::traits::generation::Provider;
use tutor_ai::types::generation::Request;

pub use entity_api::suggestion::Suggestion;

/// History longer than this many characters is cut before it goes into the prompt.
pub const MAX_HISTORY_CHARS: usize = 1500;

/// Appended to history that was cut.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    Generated(Suggestion),
    Fallback {
        suggestion: Suggestion,
        reason: FallbackReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Every attempt was rate limited.
    RetriesExhausted,
    /// The provider failed for some other reason.
    ProviderError,
    /// The reply had no `{...}` span in it.
    NoJsonFound,
    /// The `{...}` span wasn't a complete suggestion.
    InvalidJson,
}

impl SuggestionOutcome {
    pub fn suggestion(&self) -> &Suggestion {
        match self {
            SuggestionOutcome::Generated(suggestion) => suggestion,
            SuggestionOutcome::Fallback { suggestion, .. } => suggestion,
        }
    }

    pub fn into_suggestion(self) -> Suggestion {
        match self {
            SuggestionOutcome::Generated(suggestion) => suggestion,
            SuggestionOutcome::Fallback { suggestion, .. } => suggestion,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SuggestionOutcome::Fallback { .. })
    }
}

/// Keeps at most `MAX_HISTORY_CHARS` characters of `history`.
pub fn trim_history(history: &str) -> String {
    match history.char_indices().nth(MAX_HISTORY_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &history[..cut]),
        None => history.to_string(),
    }
}

pub fn build_prompt(history: &str) -> String {
    format!(
        r#"You are an AI teaching assistant analyzing an educational conversation.

Conversation so far:
{}

Analyze this educational interaction and provide guidance in JSON format:
{{
  "nextBestAction": "What should the instructor do next to enhance learning?",
  "suggestedResponse": "A helpful teaching response or explanation",
  "learningAssessment": "Student's understanding level: Beginner/Intermediate/Advanced",
  "keyQuestions": ["Deep thinking question 1?", "Follow-up question 2?", "Application question 3?"],
  "topicsToExplore": ["Related topic 1", "Related topic 2", "Related topic 3"]
}}

Keep it concise and actionable."#,
        trim_history(history)
    )
}

/// Finds the first balanced `{...}` span in free-form model output.
///
/// Braces inside JSON string literals (including escaped quotes) don't count towards
/// the balance. Returns `None` when no opening brace is ever closed.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    NoJsonFound,
    InvalidJson(String),
}

pub fn parse_suggestion(text: &str) -> Result<Suggestion, ParseError> {
    let json = extract_json_object(text).ok_or(ParseError::NoJsonFound)?;
    serde_json::from_str(json).map_err(|err| ParseError::InvalidJson(err.to_string()))
}

/// Produces teaching suggestions with an injected generation provider.
#[derive(Clone)]
pub struct SuggestionGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    max_attempts: u32,
}

impl SuggestionGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_attempts,
        }
    }

    /// `history` is the full conversation text so far, current query included.
    pub async fn generate(&self, history: &str) -> SuggestionOutcome {
        let request = Request::new(self.model.as_str(), build_prompt(history));

        let text = match tutor_ai::generate_with_retry(
            self.provider.as_ref(),
            &request,
            self.max_attempts,
        )
        .await
        {
            Ok(text) => text,
            Err(err) => {
                let reason = match err {
                    tutor_ai::Error::RetriesExhausted { .. } => FallbackReason::RetriesExhausted,
                    _ => FallbackReason::ProviderError,
                };
                let err = Error::from(err);
                warn!("Suggestion generation failed ({reason:?}): {err}");
                return fallback(reason);
            }
        };

        match parse_suggestion(&text) {
            Ok(suggestion) => SuggestionOutcome::Generated(suggestion),
            Err(ParseError::NoJsonFound) => {
                warn!("Model reply contained no JSON object");
                fallback(FallbackReason::NoJsonFound)
            }
            Err(ParseError::InvalidJson(message)) => {
                warn!("Model reply JSON is not a suggestion: {message}");
                fallback(FallbackReason::InvalidJson)
            }
        }
    }
}

fn fallback(reason: FallbackReason) -> SuggestionOutcome {
    SuggestionOutcome::Fallback {
        suggestion: Suggestion::fallback(),
        reason,
    }
}
