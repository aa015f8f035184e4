//! RGB8 pixel storage.

use crate::color::Srgb;
use crate::error::EngineError;

/// Owned RGB8 pixels, row-major, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `data` as a `width` x `height` RGB8 image.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for a zero dimension or when `data` is
    /// not exactly `width * height * 3` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::invalid(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| EngineError::invalid("image dimensions overflow"))?;
        if data.len() != expected {
            return Err(EngineError::invalid(format!(
                "expected {expected} bytes for {width}x{height} RGB, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with one color.
    pub fn filled(width: usize, height: usize, color: Srgb) -> Result<Self, EngineError> {
        let data = color
            .to_bytes()
            .iter()
            .copied()
            .cycle()
            .take(width.saturating_mul(height).saturating_mul(3))
            .collect();
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Srgb {
        let i = (y * self.width + x) * 3;
        Srgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Srgb> + '_ {
        self.data
            .chunks_exact(3)
            .map(|c| Srgb::new(c[0], c[1], c[2]))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Dimensions that fit `width` x `height` inside a `max_dim` square,
/// keeping the aspect ratio. Images already inside are returned unchanged;
/// nothing is ever upscaled. Neither side drops below 1.
pub fn fit_within(width: usize, height: usize, max_dim: usize) -> (usize, usize) {
    let longest = width.max(height);
    if longest <= max_dim || longest == 0 {
        return (width, height);
    }
    let scale = max_dim as f64 / longest as f64;
    let scaled = |v: usize| ((v as f64 * scale).round() as usize).clamp(1, max_dim.max(1));
    (scaled(width), scaled(height))
}
