pub use entity::{
    conversation_status, conversations, speaker, suggestion, turn, SessionId, AUDIO_CHANNEL,
    DEFAULT_CHANNEL,
};

pub mod conversation;
pub mod error;

/// Session ids end up in URLs and log lines; anything empty or containing a path
/// separator is rejected before it reaches the database.
pub fn validate_session_id(session_id: &str) -> Result<(), error::Error> {
    if session_id.trim().is_empty() || session_id.contains('/') {
        Err(error::Error::invalid_query_term())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_must_be_non_empty_path_segments() {
        assert!(validate_session_id("abc123").is_ok());
        assert!(validate_session_id("session-1700000000000").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("   ").is_err());
        assert!(validate_session_id("projects/p/sessions/abc").is_err());
    }
}
