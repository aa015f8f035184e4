//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert an error response carries the expected status and kind
pub fn assert_error(response: &TestResponse, expected: StatusCode, kind: &str) {
    assert_status(response, expected);
    let json: Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(u64::from(expected.as_u16())));
    assert_eq!(json["kind"].as_str(), Some(kind), "Body: {json}");
    assert!(json["error"].is_string(), "Missing error message: {json}");
}

/// Assert every contour of a blueprint response is closed and inside the image
pub fn assert_contours_valid(blueprint: &Value) {
    let width = blueprint["width"].as_i64().unwrap();
    let height = blueprint["height"].as_i64().unwrap();

    for region in blueprint["regions"].as_array().unwrap() {
        for contour in region["contours"].as_array().unwrap() {
            let points = contour.as_array().unwrap();
            assert!(!points.is_empty(), "Empty contour in {region}");
            assert_eq!(points.first(), points.last(), "Contour not closed");
            for p in points {
                let (x, y) = (p[0].as_i64().unwrap(), p[1].as_i64().unwrap());
                assert!(
                    (0..width).contains(&x) && (0..height).contains(&y),
                    "Point ({x}, {y}) outside {width}x{height}"
                );
            }
        }
    }
}

/// Sum of region areas in a blueprint response
pub fn total_area(blueprint: &Value) -> u64 {
    blueprint["regions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["area_px"].as_u64().unwrap())
        .sum()
}
