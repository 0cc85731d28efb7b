use domain::conversation::TranscriptMessage;
use domain::conversations::Model;
use domain::turn::Turn;
use domain::DiarizedWord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// How many conversations the dashboard lists.
pub(crate) const RECENT_CONVERSATIONS: u64 = 20;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TranscriptParams {
    /// Agent platform session id
    pub session_id: Option<String>,
}

/// One row of the dashboard's conversation list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListing {
    pub session_id: String,
    pub status: String,
    pub channel: String,
    pub has_audio: bool,
    pub audio_file_url: Option<String>,
    pub audio_transcript: Option<String>,
    /// RFC 3339 timestamp
    pub start_time: String,
    pub message_count: usize,
    pub turns: Vec<Turn>,
}

impl From<Model> for ConversationListing {
    fn from(model: Model) -> Self {
        Self {
            message_count: model.turns.len(),
            session_id: model.session_id,
            status: model.status.to_string(),
            channel: model.channel,
            has_audio: model.has_audio,
            audio_file_url: model.audio_file_url,
            audio_transcript: model.audio_transcript,
            start_time: model.start_time.to_rfc3339(),
            turns: model.turns.0,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationsResponse {
    pub success: bool,
    pub conversations: Vec<ConversationListing>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptLine {
    /// "student" or "instructor"
    pub role: String,
    pub speaker: String,
    pub text: String,
}

impl From<TranscriptMessage> for TranscriptLine {
    fn from(message: TranscriptMessage) -> Self {
        Self {
            role: message.role,
            speaker: message.speaker,
            text: message.text,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub success: bool,
    pub messages: Vec<TranscriptLine>,
    /// The latest teaching suggestion, or an empty object when none was made yet.
    #[schema(value_type = Object)]
    pub suggestions: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordParams {
    pub word: String,
    /// Speaker tag assigned by the recogniser; 1 is the student
    pub speaker_tag: u32,
}

impl From<WordParams> for DiarizedWord {
    fn from(word: WordParams) -> Self {
        DiarizedWord {
            word: word.word,
            speaker_tag: word.speaker_tag,
        }
    }
}

/// Output of a finished transcription job. `words` wins over `transcript` when both are sent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachAudioTranscriptParams {
    pub audio_file_url: Option<String>,
    #[serde(default)]
    pub words: Option<Vec<WordParams>>,
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachAudioTranscriptResponse {
    pub success: bool,
    pub session_id: String,
    pub status: String,
    pub audio_transcript: Option<String>,
}
