//! Windowed color sampling at normalized coordinates.

use super::PixelBuffer;
use crate::color::Srgb;
use crate::error::EngineError;

/// Average color around a point given in normalized coordinates.
///
/// `(nx, ny)` in `[0, 1]` map to pixel `(round(nx * (w - 1)), round(ny * (h - 1)))`.
/// The square window of `radius` pixels around it is clipped to the image
/// and each channel mean is rounded.
///
/// # Errors
///
/// [`EngineError::InvalidInput`] when a coordinate is not finite or lies
/// outside `[0, 1]`.
pub fn sample(buffer: &PixelBuffer, nx: f64, ny: f64, radius: usize) -> Result<Srgb, EngineError> {
    for (name, v) in [("x", nx), ("y", ny)] {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(EngineError::invalid(format!(
                "{name} must be a normalized coordinate in [0, 1], got {v}"
            )));
        }
    }

    let cx = (nx * (buffer.width() - 1) as f64).round() as usize;
    let cy = (ny * (buffer.height() - 1) as f64).round() as usize;
    Ok(average_window(buffer, cx, cy, radius))
}

fn average_window(buffer: &PixelBuffer, cx: usize, cy: usize, radius: usize) -> Srgb {
    let x0 = cx.saturating_sub(radius);
    let y0 = cy.saturating_sub(radius);
    let x1 = cx.saturating_add(radius).min(buffer.width() - 1);
    let y1 = cy.saturating_add(radius).min(buffer.height() - 1);

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = buffer.pixel(x, y);
            sums[0] += u64::from(p.r);
            sums[1] += u64::from(p.g);
            sums[2] += u64::from(p.b);
            count += 1;
        }
    }
    assert!(count > 0, "sampling window is empty");

    let mean = |s: u64| s as f64 / count as f64;
    Srgb::clamped(mean(sums[0]), mean(sums[1]), mean(sums[2]))
}
