use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeImageParams {
    /// Base64 image data, optionally as a `data:image/...;base64,` URL
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeImageResponse {
    pub success: bool,
    pub description: String,
    pub labels: Vec<String>,
    pub objects: Vec<String>,
    pub text: String,
}
