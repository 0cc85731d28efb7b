//! Types for speech-to-text output.

use serde::{Deserialize, Serialize};

/// A recognised word tagged with the speaker the recogniser attributed it to.
///
/// Tags are small integers assigned per recording; the tutoring recordings have
/// two speakers and the student is always tag 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiarizedWord {
    pub word: String,
    pub speaker_tag: u32,
}

/// Speaker tag the recogniser assigns to the student.
pub const STUDENT_SPEAKER_TAG: u32 = 1;
