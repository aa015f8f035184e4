//! Host-supplied raster decoding seam.

use super::PixelBuffer;
use crate::error::EngineError;

/// Raster decoding and resampling, supplied by the host application.
///
/// Implementations report undecodable bytes as
/// [`EngineError::DecodeFailure`].
pub trait RasterCodec: Send + Sync {
    /// Decode an encoded image (PNG, JPEG, ...) to RGB8.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, EngineError>;

    /// Resample `buffer` to exactly `width` x `height`.
    fn resize(&self, buffer: &PixelBuffer, width: usize, height: usize) -> Result<PixelBuffer, EngineError>;
}
