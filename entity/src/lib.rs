pub mod conversation_status;
pub mod conversations;
pub mod speaker;
pub mod suggestion;
pub mod turn;

/// A type alias for a conversation's primary key. Session ids are opaque strings handed to us
/// by the conversational agent platform, so unlike most tables this one isn't keyed by a Uuid.
pub type SessionId = String;

/// Channel recorded on conversations created by the agent webhook.
pub const DEFAULT_CHANNEL: &str = "dialogflow";

/// Channel recorded on conversations created from an uploaded audio recording.
pub const AUDIO_CHANNEL: &str = "Audio";
