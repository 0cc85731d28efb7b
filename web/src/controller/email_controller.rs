use crate::controller::failure;
use crate::params::email::{SendEmailParams, SendEmailResponse};
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::emails::{self, SessionSummaryEmail};
use domain::gateway::mailersend::is_valid_email;

/// POST email a session's summary and transcript
#[utoipa::path(
    post,
    path = "/send-email",
    request_body = SendEmailParams,
    responses(
        (status = 200, description = "Email accepted for delivery", body = SendEmailResponse),
        (status = 400, description = "Invalid email address"),
        (status = 500, description = "Delivery failed"),
    )
)]
pub async fn send(
    State(app_state): State<AppState>,
    Json(params): Json<SendEmailParams>,
) -> Result<impl IntoResponse, Error> {
    let recipient = params.email.unwrap_or_default();
    if !is_valid_email(recipient.trim()) {
        return Ok(failure(StatusCode::BAD_REQUEST, "Invalid email address"));
    }

    let email = SessionSummaryEmail {
        recipient: recipient.trim().to_string(),
        session_id: params.session_id,
        summary: params.summary,
        transcript: params.transcript,
    };
    let message_id = emails::send_session_summary(&app_state.config, &email).await?;

    Ok(Json(SendEmailResponse {
        success: true,
        message_id,
        message: "Email sent successfully!".to_string(),
    })
    .into_response())
}
