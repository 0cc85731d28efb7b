use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendWhatsAppParams {
    pub phone_number: Option<String>,
    pub message: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendWhatsAppResponse {
    pub success: bool,
    pub whatsapp_url: String,
    /// International number with a leading "+"
    pub phone_number: String,
}
