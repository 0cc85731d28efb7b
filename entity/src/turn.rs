//! A single recorded exchange within a conversation, stored inside the
//! `turns` JSONB column of `conversations`.

use crate::speaker::Speaker;
use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub speaker: Speaker,
    pub text: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub page: String,
    /// Intent match confidence reported by the agent platform, 0.0 - 1.0
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub parameters: Map<String, Value>,
}

impl Turn {
    /// Builds a student turn stamped with the current time.
    pub fn from_customer(
        text: impl Into<String>,
        intent: impl Into<String>,
        page: impl Into<String>,
        confidence: f64,
        parameters: Map<String, Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            speaker: Speaker::Customer,
            text: text.into(),
            intent: intent.into(),
            page: page.into(),
            confidence: clamp_confidence(confidence),
            parameters,
        }
    }

    /// "Student: ..." / "Instructor: ..." rendering used in transcripts and prompts.
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.speaker.transcript_label(), self.text)
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Ordered, append-only list of turns. Insertion order is chronological order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Turns(pub Vec<Turn>);

impl Turns {
    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.0.iter()
    }
}
