//! Integration tests for configuration and external thread datasets.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

use threadprint::assets::AssetLoader;
use threadprint::models::AppConfig;
use threadprint::server::create_app_state;

use common::fixtures::{self, BLUE, RED};
use common::{assert_error, assert_ok, TestApp};

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_external_config_sets_cache_capacity() {
    let config = write_temp("cache:\n  capacity: 1\n");
    let loader = AssetLoader::new(Some(config.path().to_path_buf()), None);
    let app = TestApp::from_state(create_app_state(loader).unwrap());

    let first = app.register(&fixtures::solid_png(4, 4, RED)).await;
    app.register(&fixtures::solid_png(4, 4, BLUE)).await;

    let stats: Value = app.get("/api/cache").await.json();
    assert_eq!(stats["capacity"], 1);
    assert_eq!(stats["entries"], 1);

    // the first image was evicted
    let response = app
        .post_json("/api/sample", &json!({ "session_id": first, "x": 0.0, "y": 0.0 }))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_config_blueprint_defaults_apply() {
    let config = AppConfig::from_yaml("blueprint:\n  palette_size: 1\n  include_preview: false\n")
        .unwrap();
    let app = TestApp::with_config(&AssetLoader::default(), config);
    let png = fixtures::split_png(10, 10, RED, BLUE);

    let body: Value = app
        .post_json("/api/blueprint", &json!({ "image": fixtures::encode(&png) }))
        .await
        .json();
    assert_eq!(body["palette"].as_array().unwrap().len(), 1);
    assert!(body.get("preview_png").is_none());
}

#[tokio::test]
async fn test_config_max_dimension_applies() {
    let config = AppConfig::from_yaml("cache:\n  max_dimension: 8\n").unwrap();
    let app = TestApp::with_config(&AssetLoader::default(), config);

    let body: Value = app
        .post_json(
            "/api/images",
            &json!({ "image": fixtures::encode(&fixtures::solid_png(32, 16, RED)) }),
        )
        .await
        .json();
    assert_eq!(body["width"], 8);
    assert_eq!(body["height"], 4);
}

#[tokio::test]
async fn test_dataset_path_from_config() {
    let dataset = write_temp(r##"[{"id": "X1", "name": "Test Red", "hex": "#FF0000"}]"##);
    let config = write_temp(&format!(
        "threads:\n  dataset: {}\n",
        dataset.path().display()
    ));
    let loader = AssetLoader::new(Some(config.path().to_path_buf()), None);
    let app = TestApp::from_state(create_app_state(loader).unwrap());

    let response = app
        .post_json("/api/threads/match", &json!({ "hex": "#00FF00" }))
        .await;
    assert_ok(&response);

    let body: Value = response.json();
    assert_eq!(body["best"]["id"], "X1");
    assert_eq!(body["alternatives"], json!([]));
}

#[tokio::test]
async fn test_threads_file_overrides_config() {
    let from_config = write_temp(r##"[{"id": "C", "name": "Config", "hex": "#000000"}]"##);
    let from_env = write_temp(r##"[{"id": "E", "name": "Env", "hex": "#000000"}]"##);
    let config = write_temp(&format!(
        "threads:\n  dataset: {}\n",
        from_config.path().display()
    ));
    let loader = AssetLoader::new(
        Some(config.path().to_path_buf()),
        Some(from_env.path().to_path_buf()),
    );
    let app = TestApp::from_state(create_app_state(loader).unwrap());

    let body: Value = app
        .post_json("/api/threads/match", &json!({ "hex": "#000000" }))
        .await
        .json();
    assert_eq!(body["best"]["id"], "E");
}

#[tokio::test]
async fn test_broken_dataset_makes_matching_unavailable() {
    let dataset = write_temp("this is not json");
    let loader = AssetLoader::new(None, Some(dataset.path().to_path_buf()));
    let app = TestApp::from_state(create_app_state(loader).unwrap());

    let response = app
        .post_json("/api/threads/match", &json!({ "hex": "#E31D42" }))
        .await;
    assert_error(
        &response,
        StatusCode::SERVICE_UNAVAILABLE,
        "dataset_unavailable",
    );

    // the rest of the API keeps working, without thread matches
    let png = fixtures::solid_png(4, 4, RED);
    let body: Value = app
        .post_json(
            "/api/blueprint",
            &json!({ "image": fixtures::encode(&png), "include_preview": false }),
        )
        .await
        .json();
    assert!(body["palette"][0]["dmc_match"].is_null());
}

#[tokio::test]
async fn test_body_limit_from_config() {
    let config = AppConfig::from_yaml("limits:\n  max_upload_bytes: 64\n").unwrap();
    let app = TestApp::with_config(&AssetLoader::default(), config);

    let image = fixtures::encode(&fixtures::solid_png(32, 32, RED));
    let response = app.post_json("/api/images", &json!({ "image": image })).await;
    assert_error(&response, StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large");
}
