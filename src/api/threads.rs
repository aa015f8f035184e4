use axum::{extract::State, Json};
use blueprint_engine::{ColorQuery, ThreadCandidate, ThreadMatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::extract::ApiJson;
use crate::error::ApiError;
use crate::server::AppState;

/// Request body for thread matching; `hex` wins when both are given
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MatchThreadRequest {
    /// Components in 0..=255, clamped and rounded
    #[serde(default)]
    #[schema(value_type = Option<Vec<f64>>)]
    pub rgb: Option<[f64; 3]>,
    /// `#RRGGBB` or `RRGGBB`
    #[serde(default)]
    pub hex: Option<String>,
}

/// One catalog thread and its CIE76 distance from the query
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreadCandidateBody {
    pub id: String,
    pub name: String,
    pub hex: String,
    #[schema(value_type = Vec<u8>)]
    pub rgb: [u8; 3],
    pub delta_e: f64,
}

impl From<&ThreadCandidate> for ThreadCandidateBody {
    fn from(c: &ThreadCandidate) -> Self {
        Self {
            id: c.thread.id.clone(),
            name: c.thread.name.clone(),
            hex: c.thread.hex.clone(),
            rgb: c.thread.rgb.to_bytes(),
            delta_e: c.delta_e,
        }
    }
}

/// Closest thread plus up to five runners-up, ascending by delta E
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreadMatchBody {
    pub best: ThreadCandidateBody,
    pub alternatives: Vec<ThreadCandidateBody>,
}

impl From<&ThreadMatch> for ThreadMatchBody {
    fn from(m: &ThreadMatch) -> Self {
        Self {
            best: (&m.best).into(),
            alternatives: m.alternatives.iter().map(Into::into).collect(),
        }
    }
}

/// Match a color against the DMC catalog
#[utoipa::path(
    post,
    path = "/api/threads/match",
    request_body = MatchThreadRequest,
    responses(
        (status = 200, description = "Nearest threads", body = ThreadMatchBody),
        (status = 400, description = "Missing or malformed color"),
        (status = 503, description = "No thread dataset loaded"),
    ),
    tag = "Threads"
)]
pub async fn handle_match_thread(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MatchThreadRequest>,
) -> Result<Json<ThreadMatchBody>, ApiError> {
    let query = ColorQuery {
        hex: request.hex,
        rgb: request.rgb,
    };
    let matched = state.service.match_color(&query)?;
    Ok(Json((&matched).into()))
}
