use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RingOutParams {
    pub from_number: Option<String>,
    pub to_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RingOutResponse {
    pub success: bool,
    pub status: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingParams {
    pub meeting_name: Option<String>,
    pub meeting_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub success: bool,
    pub join_url: Option<String>,
    pub meeting_id: Option<String>,
}
