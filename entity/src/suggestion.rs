//! Teaching guidance produced for the latest student turn. Only the most recent
//! suggestion is kept, in the `latest_suggestions` JSONB column.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub next_best_action: String,
    pub suggested_response: String,
    pub learning_assessment: String,
    pub key_questions: Vec<String>,
    pub topics_to_explore: Vec<String>,
}

impl Suggestion {
    /// Static guidance substituted whenever an AI-derived suggestion can't be produced.
    pub fn fallback() -> Self {
        Self {
            next_best_action: "Check student understanding with follow-up questions".to_string(),
            suggested_response:
                "That's a great question! Let me explain that concept in more detail..."
                    .to_string(),
            learning_assessment: "Beginner - needs more foundational concepts".to_string(),
            key_questions: vec![
                "Can you explain this concept in your own words?".to_string(),
                "What real-world applications can you think of?".to_string(),
                "How does this relate to what we learned earlier?".to_string(),
            ],
            topics_to_explore: vec![
                "Foundational principles".to_string(),
                "Practical applications".to_string(),
                "Advanced concepts".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization_requires_every_field() {
        let partial = serde_json::json!({
            "nextBestAction": "Ask a question",
            "suggestedResponse": "Sure"
        });
        assert!(serde_json::from_value::<Suggestion>(partial).is_err());
    }

    #[test]
    fn fallback_has_all_fields_populated() {
        let fallback = Suggestion::fallback();
        let value = serde_json::to_value(&fallback).unwrap();

        for field in [
            "nextBestAction",
            "suggestedResponse",
            "learningAssessment",
            "keyQuestions",
            "topicsToExplore",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(fallback.key_questions.len(), 3);
        assert_eq!(fallback.topics_to_explore.len(), 3);
    }
}
