use crate::controller::failure;
use crate::params::non_blank;
use crate::params::ringcentral::{MeetingParams, MeetingResponse, RingOutParams, RingOutResponse};
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::gateway::ringcentral::{self, DEFAULT_MEETING_NAME, DEFAULT_MEETING_TYPE};

/// POST place a RingOut call between two numbers
#[utoipa::path(
    post,
    path = "/ringcentral-call",
    request_body = RingOutParams,
    responses(
        (status = 200, description = "Call placed", body = RingOutResponse),
        (status = 400, description = "Either number missing"),
        (status = 500, description = "RingCentral rejected the call"),
    )
)]
pub async fn call(
    State(app_state): State<AppState>,
    Json(params): Json<RingOutParams>,
) -> Result<impl IntoResponse, Error> {
    let (Some(from_number), Some(to_number)) = (
        non_blank(params.from_number.as_deref()),
        non_blank(params.to_number.as_deref()),
    ) else {
        return Ok(failure(StatusCode::BAD_REQUEST, "Both numbers required"));
    };

    let client = ringcentral::Client::from_config(&app_state.config)?;
    let status = client.ring_out(from_number, to_number).await?;

    Ok(Json(RingOutResponse {
        success: true,
        status,
    })
    .into_response())
}

/// POST open a RingCentral video meeting
#[utoipa::path(
    post,
    path = "/ringcentral-video",
    request_body = MeetingParams,
    responses(
        (status = 200, description = "Meeting created", body = MeetingResponse),
        (status = 500, description = "RingCentral rejected the meeting"),
    )
)]
pub async fn video(
    State(app_state): State<AppState>,
    params: Option<Json<MeetingParams>>,
) -> Result<impl IntoResponse, Error> {
    let params = params.map(|Json(params)| params).unwrap_or_default();
    let meeting_name = non_blank(params.meeting_name.as_deref()).unwrap_or(DEFAULT_MEETING_NAME);
    let meeting_type = non_blank(params.meeting_type.as_deref()).unwrap_or(DEFAULT_MEETING_TYPE);

    let client = ringcentral::Client::from_config(&app_state.config)?;
    let meeting = client.create_meeting(meeting_name, meeting_type).await?;

    Ok(Json(MeetingResponse {
        success: true,
        join_url: meeting.join_url,
        meeting_id: meeting.meeting_id,
    }))
}
