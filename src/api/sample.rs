use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::blueprint::rounded_lab;
use super::images::ImageRef;
use super::threads::ThreadMatchBody;
use super::extract::ApiJson;
use crate::error::ApiError;
use crate::server::AppState;

/// Request body for color sampling
#[derive(Debug, Deserialize, ToSchema)]
pub struct SampleRequest {
    #[serde(flatten)]
    pub image: ImageRef,
    /// Normalized horizontal position, 0..=1
    pub x: f64,
    /// Normalized vertical position, 0..=1
    pub y: f64,
    /// Half-width of the averaged window in pixels
    #[serde(default)]
    pub radius: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SampleResponse {
    #[schema(value_type = Vec<u8>)]
    pub rgb: [u8; 3],
    #[schema(value_type = Vec<f64>)]
    pub lab: [f64; 3],
    pub hex: String,
    /// Nearest threads, null when no dataset is loaded
    #[serde(rename = "match")]
    pub thread_match: Option<ThreadMatchBody>,
}

/// Sample the average color around a point
#[utoipa::path(
    post,
    path = "/api/sample",
    request_body = SampleRequest,
    responses(
        (status = 200, description = "Sampled color", body = SampleResponse),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Unknown session id"),
    ),
    tag = "Blueprint"
)]
pub async fn handle_sample(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SampleRequest>,
) -> Result<Json<SampleResponse>, ApiError> {
    let (x, y, radius) = (request.x, request.y, request.radius);
    let input = request.image.into_input()?;
    let service = state.service.clone();

    let sampled =
        tokio::task::spawn_blocking(move || service.sample(&input, x, y, radius)).await??;

    Ok(Json(SampleResponse {
        rgb: sampled.color.to_bytes(),
        lab: rounded_lab(&sampled.lab),
        hex: sampled.color.to_hex(),
        thread_match: sampled.thread.as_ref().map(Into::into),
    }))
}
