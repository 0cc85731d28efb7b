use crate::controller::failure;
use crate::params::image::{AnalyzeImageParams, AnalyzeImageResponse};
use crate::params::non_blank;
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::image_analysis;
use log::*;

/// POST analyze an uploaded image
#[utoipa::path(
    post,
    path = "/analyze-image",
    request_body = AnalyzeImageParams,
    responses(
        (status = 200, description = "Detected labels, objects and text", body = AnalyzeImageResponse),
        (status = 400, description = "No image data"),
        (status = 500, description = "Annotation failed or isn't configured"),
    )
)]
pub async fn analyze(
    State(app_state): State<AppState>,
    Json(params): Json<AnalyzeImageParams>,
) -> Result<impl IntoResponse, Error> {
    let Some(image) = non_blank(params.image.as_deref()) else {
        return Ok(failure(StatusCode::BAD_REQUEST, "image required"));
    };
    let Some(provider) = app_state.annotation.as_ref() else {
        warn!("Image analysis requested but no annotation provider is configured");
        return Ok(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Image analysis is not configured",
        ));
    };

    let analysis = image_analysis::analyze(provider.as_ref(), image).await?;

    Ok(Json(AnalyzeImageResponse {
        success: true,
        description: analysis.description,
        labels: analysis.annotation.labels,
        objects: analysis.annotation.objects,
        text: analysis.annotation.text,
    })
    .into_response())
}
