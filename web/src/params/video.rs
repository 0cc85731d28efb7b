use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoParams {
    pub transcript: Option<String>,
    #[serde(default)]
    pub session_id: String,
    pub custom_prompt: Option<String>,
    #[serde(default)]
    pub preview_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoPromptPreview {
    pub success: bool,
    pub video_prompt: Option<String>,
    pub message: String,
}

/// The prompt plus where and how to render it; rendering itself happens in the studio.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlanResponse {
    pub success: bool,
    pub message: String,
    pub video_prompt: Option<String>,
    pub studio_url: String,
    pub instructions: Vec<String>,
    pub output_path: String,
    pub estimated_time: String,
    pub session_id: String,
}
