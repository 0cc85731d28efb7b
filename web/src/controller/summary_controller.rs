use crate::controller::failure;
use crate::params::non_blank;
use crate::params::summary::{GenerateSummaryParams, SummaryResponse};
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::summary::{self, SummaryOutcome};

/// POST generate a summary of a session
#[utoipa::path(
    post,
    path = "/generate-summary",
    request_body = GenerateSummaryParams,
    responses(
        (status = 200, description = "Summary, or success=false when the session is empty", body = SummaryResponse),
        (status = 400, description = "sessionId missing"),
        (status = 404, description = "Session not found"),
        (status = 503, description = "Generation provider is rate limiting"),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(params): Json<GenerateSummaryParams>,
) -> Result<impl IntoResponse, Error> {
    let Some(session_id) = non_blank(params.session_id.as_deref()) else {
        return Ok(failure(StatusCode::BAD_REQUEST, "sessionId required"));
    };
    let model = non_blank(params.model.as_deref()).unwrap_or(app_state.config.gemini_chat_model());

    let outcome = summary::summarize(
        app_state.store.as_ref(),
        app_state.generation.as_ref(),
        session_id,
        model,
        app_state.config.ai_max_attempts,
    )
    .await?;

    Ok(match outcome {
        SummaryOutcome::Summary(summary) => Json(SummaryResponse {
            success: true,
            summary,
        })
        .into_response(),
        SummaryOutcome::NoConversationData => failure(StatusCode::OK, "No conversation data"),
    })
}
