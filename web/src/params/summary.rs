use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryParams {
    pub session_id: Option<String>,
    /// Generation model; the configured chat model when absent
    pub model: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: String,
}
