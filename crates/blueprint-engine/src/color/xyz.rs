//! CIE XYZ color type (D65 reference white)

use super::linear_rgb::LinearRgb;

/// D65 reference white, Y normalized to 1.0.
pub(crate) const WHITE_X: f64 = 0.95047;
pub(crate) const WHITE_Y: f64 = 1.0;
pub(crate) const WHITE_Z: f64 = 1.08883;

/// A color in CIE 1931 XYZ, relative to the D65 white point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<LinearRgb> for Xyz {
    fn from(c: LinearRgb) -> Self {
        Self {
            x: 0.4124564 * c.r + 0.3575761 * c.g + 0.1804375 * c.b,
            y: 0.2126729 * c.r + 0.7151522 * c.g + 0.0721750 * c.b,
            z: 0.0193339 * c.r + 0.1191920 * c.g + 0.9503041 * c.b,
        }
    }
}

impl From<Xyz> for LinearRgb {
    fn from(c: Xyz) -> Self {
        LinearRgb::new(
            3.2404542 * c.x - 1.5371385 * c.y - 0.4985314 * c.z,
            -0.9692660 * c.x + 1.8760108 * c.y + 0.0415560 * c.z,
            0.0556434 * c.x - 0.2040259 * c.y + 1.0572252 * c.z,
        )
    }
}
