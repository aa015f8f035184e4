use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::server::AppState;

/// Image cache counters
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Report image cache usage
#[utoipa::path(
    get,
    path = "/api/cache",
    responses(
        (status = 200, description = "Cache counters", body = CacheStatsResponse),
    ),
    tag = "Images"
)]
pub async fn handle_cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.service.cache_stats();
    Json(CacheStatsResponse {
        entries: stats.entries,
        capacity: stats.capacity,
        hits: stats.hits,
        misses: stats.misses,
    })
}
