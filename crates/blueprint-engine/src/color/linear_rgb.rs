//! Linear RGB color type
//!
//! Light-proportional RGB. The sRGB transfer function is applied with the
//! exact piecewise formula (IEC 61966-2-1) rather than a lookup table so both
//! directions stay pure functions of f64 input.

use super::srgb::Srgb;

/// Decode one sRGB channel in 0.0..=1.0 to linear light.
#[inline]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode one linear channel back to sRGB in 0.0..=1.0.
///
/// Negative input encodes to a negative value; clamping happens when the
/// result is turned into bytes.
#[inline]
pub fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// A color in linear RGB, channels nominally 0.0..=1.0.
///
/// Values outside that range appear when out-of-gamut LAB colors are
/// converted back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Gamma-encode, round and clamp to 8-bit sRGB.
    pub fn to_srgb(self) -> Srgb {
        Srgb::clamped(
            linear_to_srgb(self.r) * 255.0,
            linear_to_srgb(self.g) * 255.0,
            linear_to_srgb(self.b) * 255.0,
        )
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(f64::from(srgb.r) / 255.0),
            g: srgb_to_linear(f64::from(srgb.g) / 255.0),
            b: srgb_to_linear(f64::from(srgb.b) / 255.0),
        }
    }
}

impl From<LinearRgb> for Srgb {
    fn from(linear: LinearRgb) -> Self {
        linear.to_srgb()
    }
}
