//! Session summaries written by the generation provider.

use crate::conversation::{find_existing, ConversationStore};
use crate::conversations::Model;
use crate::error::Error;
use log::*;
use tutor_ai::traits::generation::Provider;
use tutor_ai::types::generation::{is_valid_model_name, Request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Summary(String),
    /// The session has neither an audio transcript nor any turns.
    NoConversationData,
}

/// Text handed to the model: the audio transcript, then the agent turns.
pub fn conversation_text(conversation: &Model) -> String {
    let mut text = String::new();

    if let Some(transcript) = conversation.audio_transcript.as_deref() {
        if !transcript.trim().is_empty() {
            text.push_str(transcript);
            text.push_str("\n\n");
        }
    }

    for turn in conversation.turns.iter() {
        text.push_str(&turn.transcript_line());
        text.push('\n');
    }

    text
}

pub fn build_summary_prompt(conversation_text: &str) -> String {
    format!(
        "Summarize this educational session:\n\n{conversation_text}\n\nInclude main topics, key points, and assessment."
    )
}

pub async fn summarize(
    store: &dyn ConversationStore,
    provider: &dyn Provider,
    session_id: &str,
    model: &str,
    max_attempts: u32,
) -> Result<SummaryOutcome, Error> {
    if !is_valid_model_name(model) {
        warn!("Rejecting summary request for model {model:?}");
        return Err(Error::invalid());
    }

    let conversation = find_existing(store, session_id).await?;

    let text = conversation_text(&conversation);
    if text.trim().is_empty() {
        info!("Nothing to summarize for session: {session_id}");
        return Ok(SummaryOutcome::NoConversationData);
    }

    debug!("Summarizing session {session_id} with {model}");
    let request = Request::new(model, build_summary_prompt(&text));
    let summary = tutor_ai::generate_with_retry(provider, &request, max_attempts).await?;

    Ok(SummaryOutcome::Summary(summary))
}
