use crate::controller::failure;
use crate::params::whatsapp::{SendWhatsAppParams, SendWhatsAppResponse};
use crate::Error;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::gateway::whatsapp;

/// POST build a WhatsApp click-to-chat link
///
/// Nothing is sent; the link opens WhatsApp with the message prefilled.
#[utoipa::path(
    post,
    path = "/send-whatsapp",
    request_body = SendWhatsAppParams,
    responses(
        (status = 200, description = "Link built", body = SendWhatsAppResponse),
        (status = 400, description = "No usable phone number"),
    )
)]
pub async fn share(Json(params): Json<SendWhatsAppParams>) -> Result<impl IntoResponse, Error> {
    let Some(phone_number) = params.phone_number.as_deref() else {
        return Ok(failure(StatusCode::BAD_REQUEST, "Phone number required"));
    };

    let link = whatsapp::build_link(
        phone_number,
        params.message.as_deref(),
        params.video_url.as_deref(),
    )?;

    Ok(Json(SendWhatsAppResponse {
        success: true,
        whatsapp_url: link.url,
        phone_number: link.phone_number,
    })
    .into_response())
}
