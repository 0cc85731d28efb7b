//! Types for text generation.

use serde::{Deserialize, Serialize};

/// A single-turn generation request.
///
/// No conversation state is kept by providers between requests; any history the
/// model should see has to be rendered into `prompt` by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Provider model identifier, e.g. "gemini-2.5-flash".
    pub model: String,
    pub prompt: String,
    /// Persona or behaviour instructions applied ahead of the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl Request {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
    /// Whether `model` is safe to place in a provider URL path segment.
    pub fn has_valid_model(&self) -> bool {
        is_valid_model_name(&self.model)
    }
}

/// Model identifiers are limited to ASCII letters, digits, `.`, `_` and `-`.
pub fn is_valid_model_name(model: &str) -> bool {
    !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_are_plain_identifiers() {
        assert!(is_valid_model_name("gemini-2.5-flash"));
        assert!(is_valid_model_name("gemini_2.0.flash-exp"));

        assert!(!is_valid_model_name(""));
        assert!(!is_valid_model_name("../files"));
        assert!(!is_valid_model_name("gemini-2.5-flash:streamGenerateContent?alt=sse"));
        assert!(!is_valid_model_name("gemini 2.5"));
    }
}
