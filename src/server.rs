//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::services::{load_catalog, BlueprintService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BlueprintService>,
    pub config: Arc<AppConfig>,
}

/// Create application state from an asset loader.
///
/// The thread dataset comes from `THREADS_FILE`, then `threads.dataset` in the
/// config, then the embedded copy.
pub fn create_app_state(asset_loader: AssetLoader) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader);
    let threads_override = asset_loader.threads_file().map(PathBuf::from);
    let asset_loader = asset_loader.with_threads_file(config.threads_dataset(threads_override));
    Ok(create_app_state_with_config(&asset_loader, config))
}

/// Create application state from an already loaded configuration.
pub fn create_app_state_with_config(asset_loader: &AssetLoader, config: AppConfig) -> AppState {
    let catalog = load_catalog(asset_loader).map(Arc::new);
    let service = Arc::new(BlueprintService::from_config(&config, catalog));

    AppState {
        service,
        config: Arc::new(config),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.limits.max_upload_bytes;

    Router::new()
        .route("/api/images", post(api::handle_register_image))
        .route("/api/blueprint", post(api::handle_blueprint))
        .route("/api/sample", post(api::handle_sample))
        .route("/api/threads/match", post(api::handle_match_thread))
        .route("/api/cache", get(api::handle_cache_stats))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
