//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use threadprint::assets::AssetLoader;
use threadprint::models::AppConfig;
use threadprint::server::{build_router, create_app_state, create_app_state_with_config, AppState};

/// Test application driving the production router in-process
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application using embedded assets
    pub fn new() -> Self {
        let state = create_app_state(AssetLoader::default()).expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Create a test application with an explicit config and asset loader
    pub fn with_config(loader: &AssetLoader, config: AppConfig) -> Self {
        Self::from_state(create_app_state_with_config(loader, config))
    }

    pub fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        self.post_raw(path, body.to_string()).await
    }

    /// Make a POST request with an arbitrary body labelled as JSON
    pub async fn post_raw(&self, path: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register an image and return its session id
    pub async fn register(&self, png: &[u8]) -> String {
        let body = serde_json::json!({ "image": super::fixtures::encode(png) });
        let response = self.post_json("/api/images", &body).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());

        let json: Value = response.json();
        json["session_id"].as_str().unwrap().to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
