use crate::params::video::{GenerateVideoParams, VideoPlanResponse, VideoPromptPreview};
use crate::AppState;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::video;
use log::*;

/// POST build an educational video prompt
///
/// With `previewOnly` just the prompt comes back; otherwise the response also says
/// where to render it and where the output will be stored.
#[utoipa::path(
    post,
    path = "/generate-video",
    request_body = GenerateVideoParams,
    responses(
        (status = 200, description = "Prompt preview", body = VideoPromptPreview),
        (status = 200, description = "Prompt with rendering plan", body = VideoPlanResponse),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(params): Json<GenerateVideoParams>,
) -> impl IntoResponse {
    info!(
        "Video prompt request for session: {}, preview: {}",
        params.session_id, params.preview_only
    );

    let video_prompt =
        video::resolve_prompt(params.custom_prompt.as_deref(), params.transcript.as_deref());

    if params.preview_only {
        return Json(VideoPromptPreview {
            success: true,
            video_prompt,
            message: "Prompt generated for preview".to_string(),
        })
        .into_response();
    }

    let plan = video::plan(&app_state.config, &params.session_id);
    Json(VideoPlanResponse {
        success: true,
        message: "Video prompt ready! Use the studio to generate.".to_string(),
        video_prompt,
        studio_url: plan.studio_url,
        instructions: plan.instructions,
        output_path: plan.output_path,
        estimated_time: plan.estimated_time,
        session_id: params.session_id,
    })
    .into_response()
}
