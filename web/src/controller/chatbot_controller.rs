use crate::params::chat::{ChatParams, ChatResponse};
use crate::params::non_blank;
use crate::AppState;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::tutor;
use log::*;

/// POST a message to the chat tutor
#[utoipa::path(
    post,
    path = "/chatbot",
    request_body = ChatParams,
    responses(
        (status = 200, description = "The tutor's reply", body = ChatResponse),
        (status = 400, description = "Blank message", body = ChatResponse),
        (status = 500, description = "Generation failed", body = ChatResponse),
    )
)]
pub async fn chat(
    State(app_state): State<AppState>,
    Json(params): Json<ChatParams>,
) -> impl IntoResponse {
    let Some(message) = non_blank(params.message.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                success: None,
                response: "Please provide a message.".to_string(),
            }),
        );
    };
    let model = non_blank(params.model.as_deref()).unwrap_or(app_state.config.gemini_chat_model());

    match tutor::reply(
        app_state.generation.as_ref(),
        message,
        model,
        app_state.config.ai_max_attempts,
    )
    .await
    {
        Ok(response) => (
            StatusCode::OK,
            Json(ChatResponse {
                success: Some(true),
                response,
            }),
        ),
        Err(err) => {
            error!("Tutor chat failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    success: Some(false),
                    response: "Error processing request".to_string(),
                }),
            )
        }
    }
}
