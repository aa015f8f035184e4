//! Image decoding and resampling with the `image` crate.

use blueprint_engine::{EngineError, PixelBuffer, RasterCodec};
use image::imageops::FilterType;
use image::RgbImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported or corrupt image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image dimensions {width}x{height} exceed the supported range")]
    Dimensions { width: usize, height: usize },

    #[error("Invalid pixel buffer: {0}")]
    Buffer(#[from] EngineError),

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

impl From<CodecError> for EngineError {
    fn from(e: CodecError) -> Self {
        match e {
            // already carries its own kind
            CodecError::Buffer(inner) => inner,
            other => EngineError::DecodeFailure(other.to_string()),
        }
    }
}

/// PNG and JPEG decoder with Lanczos3 downscaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }

    /// Decode without the engine error mapping.
    pub fn decode_rgb(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
        let decoded = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);
        tracing::trace!(width, height, "Decoded image");
        Ok(PixelBuffer::new(width, height, decoded.into_raw())?)
    }

    pub fn resize_rgb(
        &self,
        buffer: &PixelBuffer,
        width: usize,
        height: usize,
    ) -> Result<PixelBuffer, CodecError> {
        let dims = |w: usize, h: usize| -> Result<(u32, u32), CodecError> {
            match (u32::try_from(w), u32::try_from(h)) {
                (Ok(w), Ok(h)) => Ok((w, h)),
                _ => Err(CodecError::Dimensions {
                    width: w,
                    height: h,
                }),
            }
        };
        let (src_w, src_h) = dims(buffer.width(), buffer.height())?;
        let (dst_w, dst_h) = dims(width, height)?;

        let source = RgbImage::from_raw(src_w, src_h, buffer.as_bytes().to_vec()).ok_or(
            CodecError::Dimensions {
                width: buffer.width(),
                height: buffer.height(),
            },
        )?;
        let resized = image::imageops::resize(&source, dst_w, dst_h, FilterType::Lanczos3);
        Ok(PixelBuffer::new(width, height, resized.into_raw())?)
    }
}

impl RasterCodec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, EngineError> {
        self.decode_rgb(bytes).map_err(|e| match e {
            // a zero-sized image is still a bad upload, not a bad request
            CodecError::Buffer(inner) => EngineError::DecodeFailure(inner.to_string()),
            other => other.into(),
        })
    }

    fn resize(
        &self,
        buffer: &PixelBuffer,
        width: usize,
        height: usize,
    ) -> Result<PixelBuffer, EngineError> {
        Ok(self.resize_rgb(buffer, width, height)?)
    }
}
