//! Integration tests for image registration and the cache endpoint.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures::{self, RED};
use common::{assert_error, assert_ok, TestApp};

#[tokio::test]
async fn test_register_image() {
    let app = TestApp::new();
    let png = fixtures::solid_png(16, 8, RED);

    let response = app
        .post_json("/api/images", &json!({ "image": fixtures::encode(&png) }))
        .await;
    assert_ok(&response);

    let body: Value = response.json();
    let session_id = body["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 32);
    assert!(session_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(body["width"], 16);
    assert_eq!(body["height"], 8);
    assert_eq!(body["cached"], false);
}

#[tokio::test]
async fn test_register_same_image_twice_is_cached() {
    let app = TestApp::new();
    let request = json!({ "image": fixtures::encode(&fixtures::solid_png(8, 8, RED)) });

    let first: Value = app.post_json("/api/images", &request).await.json();
    let second: Value = app.post_json("/api/images", &request).await.json();

    assert_eq!(first["session_id"], second["session_id"]);
    assert_eq!(first["width"], second["width"]);
    assert_eq!(second["cached"], true);
}

#[tokio::test]
async fn test_register_downscales_to_max_dimension() {
    let app = TestApp::new();
    let png = fixtures::solid_png(40, 20, RED);

    let response = app
        .post_json(
            "/api/images",
            &json!({ "image": fixtures::encode(&png), "max_dimension": 10 }),
        )
        .await;
    assert_ok(&response);

    let body: Value = response.json();
    assert_eq!(body["width"], 10);
    assert_eq!(body["height"], 5);
}

#[tokio::test]
async fn test_max_dimension_changes_session_id() {
    let app = TestApp::new();
    let image = fixtures::encode(&fixtures::solid_png(40, 20, RED));

    let small: Value = app
        .post_json("/api/images", &json!({ "image": image, "max_dimension": 10 }))
        .await
        .json();
    let large: Value = app
        .post_json("/api/images", &json!({ "image": image, "max_dimension": 20 }))
        .await
        .json();

    assert_ne!(small["session_id"], large["session_id"]);
}

#[tokio::test]
async fn test_register_accepts_data_url() {
    let app = TestApp::new();
    let png = fixtures::solid_png(4, 4, RED);
    let image = format!("data:image/png;base64,{}", fixtures::encode(&png));

    let response = app.post_json("/api/images", &json!({ "image": image })).await;
    assert_ok(&response);
}

#[tokio::test]
async fn test_register_rejects_invalid_base64() {
    let app = TestApp::new();
    let response = app
        .post_json("/api/images", &json!({ "image": "not base64!" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "invalid_input");
}

#[tokio::test]
async fn test_register_rejects_undecodable_image() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/images",
            &json!({ "image": fixtures::encode(b"definitely not an image") }),
        )
        .await;
    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "decode_failure");
}

#[tokio::test]
async fn test_register_rejects_zero_max_dimension() {
    let app = TestApp::new();
    let png = fixtures::solid_png(4, 4, RED);
    let response = app
        .post_json(
            "/api/images",
            &json!({ "image": fixtures::encode(&png), "max_dimension": 0 }),
        )
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "invalid_input");
}

#[tokio::test]
async fn test_cache_stats_track_hits() {
    let app = TestApp::new();
    let session_id = app.register(&fixtures::solid_png(6, 6, RED)).await;

    let stats: Value = app.get("/api/cache").await.json();
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["capacity"], 32);

    app.post_json(
        "/api/sample",
        &json!({ "session_id": session_id, "x": 0.5, "y": 0.5 }),
    )
    .await;
    app.post_json(
        "/api/sample",
        &json!({ "session_id": "00000000000000000000000000000000", "x": 0.5, "y": 0.5 }),
    )
    .await;

    let stats: Value = app.get("/api/cache").await.json();
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 2);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_ok(&response);
    assert_eq!(response.text(), "OK");
}
