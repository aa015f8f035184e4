use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejections render as [`ApiError`] bodies.
///
/// Malformed JSON, a wrong content type and out-of-range fields all come
/// back as `400 invalid_input`; an oversized body keeps its 413.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
