use axum::{extract::State, Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::extract::ApiJson;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::ImageInput;

/// Request body for image registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterImageRequest {
    /// Base64-encoded PNG or JPEG (a `data:` URL prefix is accepted)
    pub image: String,
    /// Longest side after downscaling (default from config)
    #[serde(default)]
    pub max_dimension: Option<usize>,
}

/// Response from image registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterImageResponse {
    /// Content-derived id, stable for identical bytes and max_dimension
    pub session_id: String,
    pub width: usize,
    pub height: usize,
    /// True when the image was already cached
    pub cached: bool,
}

/// Reference to the pixels a request works on.
///
/// `session_id` wins when both forms are present.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ImageRef {
    /// Id returned by `POST /api/images`
    #[serde(default)]
    pub session_id: Option<String>,
    /// Base64-encoded PNG or JPEG, registered on the fly
    #[serde(default)]
    pub image: Option<String>,
    /// Longest side when `image` is given
    #[serde(default)]
    pub max_dimension: Option<usize>,
}

impl ImageRef {
    pub fn into_input(self) -> Result<ImageInput, ApiError> {
        match (self.session_id, self.image) {
            (Some(id), _) => Ok(ImageInput::Session(id)),
            (None, Some(image)) => Ok(ImageInput::Encoded {
                bytes: decode_image_field(&image)?,
                max_dimension: self.max_dimension,
            }),
            (None, None) => Err(ApiError::BadRequest(
                "provide either session_id or image".to_string(),
            )),
        }
    }
}

/// Decode a base64 image field, tolerating a `data:image/...;base64,` prefix.
pub fn decode_image_field(field: &str) -> Result<Vec<u8>, ApiError> {
    let payload = match field.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => field,
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ApiError::BadRequest(format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("image is empty".to_string()));
    }
    Ok(bytes)
}

/// Register an image
///
/// Decodes the image once, downscales it to fit `max_dimension` and caches the
/// pixels under a content-derived session id.
#[utoipa::path(
    post,
    path = "/api/images",
    request_body = RegisterImageRequest,
    responses(
        (status = 200, description = "Image cached", body = RegisterImageResponse),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Image could not be decoded"),
    ),
    tag = "Images"
)]
pub async fn handle_register_image(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterImageRequest>,
) -> Result<Json<RegisterImageResponse>, ApiError> {
    let bytes = decode_image_field(&request.image)?;
    let max_dimension = request.max_dimension;
    let service = state.service.clone();

    let registration =
        tokio::task::spawn_blocking(move || service.register(&bytes, max_dimension)).await??;

    Ok(Json(RegisterImageResponse {
        session_id: registration.session_id,
        width: registration.width,
        height: registration.height,
        cached: registration.cached,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_image_field_plain() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        assert_eq!(decode_image_field(&encoded).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_image_field_data_url() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([9u8, 8]);
        let field = format!("data:image/png;base64,{encoded}");
        assert_eq!(decode_image_field(&field).unwrap(), vec![9, 8]);
    }

    #[test]
    fn test_decode_image_field_rejects_garbage() {
        assert!(matches!(
            decode_image_field("***"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(decode_image_field(""), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_image_ref_prefers_session() {
        let image_ref = ImageRef {
            session_id: Some("abc".to_string()),
            image: Some("***".to_string()),
            max_dimension: None,
        };
        assert_eq!(
            image_ref.into_input().unwrap(),
            ImageInput::Session("abc".to_string())
        );
    }

    #[test]
    fn test_image_ref_requires_one_form() {
        assert!(matches!(
            ImageRef::default().into_input(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
