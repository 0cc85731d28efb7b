use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The student talking to the agent
    Customer,
    /// The instructor or the agent answering on their behalf
    #[serde(alias = "bot")]
    Instructor,
}

impl Speaker {
    /// Label used when a turn is rendered into a transcript line.
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Speaker::Customer => "Student",
            Speaker::Instructor => "Instructor",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Customer => write!(fmt, "customer"),
            Speaker::Instructor => write!(fmt, "instructor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_is_read_as_instructor() {
        let speaker: Speaker = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(speaker, Speaker::Instructor);
        assert_eq!(serde_json::to_string(&speaker).unwrap(), "\"instructor\"");
    }

    #[test]
    fn transcript_labels() {
        assert_eq!(Speaker::Customer.transcript_label(), "Student");
        assert_eq!(Speaker::Instructor.transcript_label(), "Instructor");
    }
}
