use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub(crate) mod chatbot_controller;
pub(crate) mod conversation_controller;
pub(crate) mod email_controller;
pub(crate) mod health_check_controller;
pub(crate) mod image_controller;
pub(crate) mod ringcentral_controller;
pub(crate) mod summary_controller;
pub(crate) mod video_controller;
pub(crate) mod webhook_controller;
pub(crate) mod whatsapp_controller;

/// A `{success: false, error}` body with the given status, for rejections decided in
/// the controller itself rather than in the domain.
pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "error": message}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failure_bodies_have_the_error_shape() {
        let response = failure(StatusCode::BAD_REQUEST, "sessionId required");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"success": false, "error": "sessionId required"}));
    }
}
