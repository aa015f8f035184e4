use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blueprint_engine::EngineError;
use serde_json::json;
use thiserror::Error;

use crate::rendering::CodecError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Preview error: {0}")]
    Preview(#[from] CodecError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Engine(e) => match e {
                EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                EngineError::NotFound(_) => StatusCode::NOT_FOUND,
                EngineError::DecodeFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::DatasetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Preview(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error class, matching the engine's error kinds.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid_input",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Engine(e) => e.kind(),
            ApiError::Preview(_) | ApiError::Internal(_) => "internal",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "kind": self.kind(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_bad_request() {
        let error = ApiError::BadRequest("image is not valid base64".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid request: image is not valid base64"
        );
        assert_eq!(error.kind(), "invalid_input");
    }

    #[test]
    fn test_api_error_engine_is_transparent() {
        let error: ApiError = EngineError::NotFound("session abc".to_string()).into();
        assert_eq!(error.to_string(), "not found: session abc");
        assert_eq!(error.kind(), "not_found");
    }

    #[test]
    fn test_api_error_from_json_rejection() {
        use axum::extract::rejection::MissingJsonContentType;

        let error: ApiError = JsonRejection::from(MissingJsonContentType::default()).into();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.kind(), "invalid_input");
    }

    #[test]
    fn test_api_error_internal() {
        let error = ApiError::Internal("worker task failed".to_string());
        assert_eq!(error.to_string(), "Internal error: worker task failed");
        assert_eq!(error.kind(), "internal");
    }

    #[test]
    fn test_api_error_preview() {
        let error: ApiError = CodecError::PngEncode("bad palette".to_string()).into();
        assert_eq!(error.to_string(), "Preview error: PNG encode error: bad palette");
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::PayloadTooLarge("x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                EngineError::InvalidInput("x".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                EngineError::NotFound("x".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::DecodeFailure("x".into()).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EngineError::DatasetUnavailable("x".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
