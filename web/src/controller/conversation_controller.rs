use crate::controller::failure;
use crate::params::conversation::{
    AttachAudioTranscriptParams, AttachAudioTranscriptResponse, ConversationListing,
    ConversationsResponse, TranscriptLine, TranscriptParams, TranscriptResponse,
    RECENT_CONVERSATIONS,
};
use crate::params::non_blank;
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use domain::audio_transcript::{self, RecognisedSpeech};
use domain::conversation::transcript_messages;
use log::*;
use serde_json::{json, Value};

/// GET the most recently started conversations
#[utoipa::path(
    get,
    path = "/conversations",
    responses(
        (status = 200, description = "Up to 20 conversations, newest first", body = ConversationsResponse),
        (status = 500, description = "Conversation store unavailable", body = ConversationsResponse),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.store.list_recent(RECENT_CONVERSATIONS).await {
        Ok(conversations) => {
            debug!("Listing {} conversations", conversations.len());
            (
                StatusCode::OK,
                Json(ConversationsResponse {
                    success: true,
                    conversations: conversations
                        .into_iter()
                        .map(ConversationListing::from)
                        .collect(),
                }),
            )
        }
        Err(err) => {
            error!("Failed to list conversations: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConversationsResponse {
                    success: false,
                    conversations: Vec::new(),
                }),
            )
        }
    }
}

/// GET a session's transcript
///
/// Lines of the audio recording's transcript come first, then the agent turns.
#[utoipa::path(
    get,
    path = "/transcript",
    params(TranscriptParams),
    responses(
        (status = 200, description = "Transcript messages and the latest suggestion", body = TranscriptResponse),
        (status = 400, description = "sessionId missing"),
        (status = 404, description = "Session not found"),
    )
)]
pub async fn transcript(
    State(app_state): State<AppState>,
    Query(params): Query<TranscriptParams>,
) -> Result<impl IntoResponse, Error> {
    let Some(session_id) = non_blank(params.session_id.as_deref()) else {
        return Ok(transcript_rejection(StatusCode::BAD_REQUEST, "sessionId required"));
    };

    let Some(conversation) = app_state.store.find(session_id).await? else {
        debug!("Transcript requested for unknown session {session_id}");
        return Ok(transcript_rejection(StatusCode::NOT_FOUND, "Session not found"));
    };

    let suggestions = match &conversation.latest_suggestions {
        Some(suggestion) => serde_json::to_value(suggestion).unwrap_or_else(|_| json!({})),
        None => Value::Object(Default::default()),
    };
    let messages = transcript_messages(&conversation)
        .into_iter()
        .map(TranscriptLine::from)
        .collect();

    Ok(Json(TranscriptResponse {
        success: true,
        messages,
        suggestions,
    })
    .into_response())
}

// The dashboard reads `messages` from every transcript reply, rejections included.
fn transcript_rejection(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"success": false, "error": message, "messages": []})),
    )
        .into_response()
}

/// POST the transcript of a session's audio recording
///
/// Creates a completed, audio-only conversation when the session has none yet.
#[utoipa::path(
    post,
    path = "/conversations/{session_id}/audio-transcript",
    params(
        ("session_id" = String, Path, description = "Agent platform session id"),
    ),
    request_body = AttachAudioTranscriptParams,
    responses(
        (status = 200, description = "Transcript stored", body = AttachAudioTranscriptResponse),
        (status = 400, description = "audioFileUrl or transcript content missing"),
    )
)]
pub async fn attach_audio_transcript(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
    Json(params): Json<AttachAudioTranscriptParams>,
) -> Result<impl IntoResponse, Error> {
    let Some(audio_file_url) = non_blank(params.audio_file_url.as_deref()) else {
        return Ok(failure(StatusCode::BAD_REQUEST, "audioFileUrl required"));
    };

    let speech = match (params.words, params.transcript) {
        (Some(words), _) if !words.is_empty() => {
            RecognisedSpeech::Diarized(words.into_iter().map(Into::into).collect())
        }
        (_, Some(transcript)) if !transcript.trim().is_empty() => {
            RecognisedSpeech::Plain(transcript)
        }
        _ => return Ok(failure(StatusCode::BAD_REQUEST, "words or transcript required")),
    };

    let conversation =
        audio_transcript::attach(app_state.store.as_ref(), &session_id, audio_file_url, speech)
            .await?;

    Ok(Json(AttachAudioTranscriptResponse {
        success: true,
        session_id: conversation.session_id,
        status: conversation.status.to_string(),
        audio_transcript: conversation.audio_transcript,
    })
    .into_response())
}
