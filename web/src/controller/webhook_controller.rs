//! Fulfillment webhook for the conversational agent platform.
//!
//! The platform gives up on a turn that gets an error status, so apart from a bad
//! secret this endpoint always answers 200 with a well formed fulfillment reply.

use crate::controller::failure;
use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::webhook::{WebhookOutcome, WebhookRequest};
use log::*;

/// POST a student turn from the conversational agent
///
/// Records the turn, asks the generation provider for teaching guidance and replies with
/// the suggested response. Malformed bodies are answered like an empty turn.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body(content = Object, content_type = "application/json", description = "Fulfillment request from the agent, parsed leniently"),
    params(
        ("x-webhook-secret" = Option<String>, Header, description = "Shared secret, required when one is configured"),
    ),
    responses(
        (status = 200, description = "Fulfillment reply for the agent"),
        (status = 401, description = "Missing or wrong webhook secret"),
    )
)]
pub async fn fulfill(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    // Validate webhook secret if configured
    if let Some(expected_secret) = app_state.config.webhook_secret() {
        let provided_secret = headers
            .get("x-webhook-secret")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if provided_secret != expected_secret {
            warn!("Invalid webhook secret received");
            return Ok(failure(StatusCode::UNAUTHORIZED, "Unauthorized"));
        }
    }

    let request = WebhookRequest::from_slice(&body);
    let outcome = app_state.orchestrator.handle(&request).await;

    match &outcome {
        WebhookOutcome::Success(response) => {
            debug!("Webhook reply: {}", response.reply_text());
        }
        WebhookOutcome::RecoveredFallback { reason, .. } => {
            warn!("Webhook answered with fallback guidance: {reason:?}");
        }
        WebhookOutcome::LoggedError { .. } => {
            info!("Webhook answered with an apology");
        }
    }

    Ok((StatusCode::OK, Json(outcome.into_response())).into_response())
}
