//! CIE L*a*b* color type
//!
//! The space the engine clusters and matches in. Euclidean distance here
//! (CIE76 delta E) tracks perceived difference well enough for palette work:
//! a delta E around 2.3 is the just-noticeable difference.

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;
use super::xyz::{Xyz, WHITE_X, WHITE_Y, WHITE_Z};

const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIE L*a*b*.
///
/// `l` is lightness 0..=100; `a` runs green to red and `b` blue to yellow,
/// both roughly -128..=127 for colors inside sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Squared CIE76 distance, for comparisons where the root is wasted.
    #[inline]
    pub fn distance_squared(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// CIE76 delta E.
    #[inline]
    pub fn delta_e76(&self, other: &Lab) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Render back to 8-bit sRGB, clamping out-of-gamut values.
    pub fn to_srgb(self) -> Srgb {
        LinearRgb::from(Xyz::from(self)).to_srgb()
    }
}

#[inline]
fn f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn f_inv(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > EPSILON {
        cubed
    } else {
        (116.0 * t - 16.0) / KAPPA
    }
}

impl From<Xyz> for Lab {
    fn from(c: Xyz) -> Self {
        let fx = f(c.x / WHITE_X);
        let fy = f(c.y / WHITE_Y);
        let fz = f(c.z / WHITE_Z);
        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Lab> for Xyz {
    fn from(c: Lab) -> Self {
        let fy = (c.l + 16.0) / 116.0;
        let fx = fy + c.a / 500.0;
        let fz = fy - c.b / 200.0;
        let y = if c.l > KAPPA * EPSILON {
            fy * fy * fy
        } else {
            c.l / KAPPA
        };
        Xyz::new(f_inv(fx) * WHITE_X, y * WHITE_Y, f_inv(fz) * WHITE_Z)
    }
}

impl From<Srgb> for Lab {
    fn from(c: Srgb) -> Self {
        Lab::from(Xyz::from(LinearRgb::from(c)))
    }
}

impl From<Lab> for Srgb {
    fn from(c: Lab) -> Self {
        c.to_srgb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white() {
        let black = Lab::from(Srgb::new(0, 0, 0));
        assert!(black.l.abs() < 1e-9);

        let white = Lab::from(Srgb::new(255, 255, 255));
        assert!((white.l - 100.0).abs() < 1e-3);
        assert!(white.a.abs() < 1e-2);
        assert!(white.b.abs() < 1e-2);
    }

    #[test]
    fn test_known_red() {
        // sRGB red under D65: L 53.24, a 80.09, b 67.20
        let red = Lab::from(Srgb::new(255, 0, 0));
        assert!((red.l - 53.24).abs() < 0.05);
        assert!((red.a - 80.09).abs() < 0.05);
        assert!((red.b - 67.20).abs() < 0.05);
    }

    #[test]
    fn test_delta_e_symmetric() {
        let a = Lab::from(Srgb::new(10, 200, 30));
        let b = Lab::from(Srgb::new(40, 10, 220));
        assert_eq!(a.delta_e76(&b), b.delta_e76(&a));
        assert_eq!(a.delta_e76(&a), 0.0);
        assert!((a.distance_squared(&b) - a.delta_e76(&b).powi(2)).abs() < 1e-9);
    }

    fn assert_round_trips(values: &[u8]) {
        for &r in values {
            for &g in values {
                for &b in values {
                    let c = Srgb::new(r, g, b);
                    let back = Lab::from(c).to_srgb();
                    assert!(
                        back.r.abs_diff(r) <= 1 && back.g.abs_diff(g) <= 1 && back.b.abs_diff(b) <= 1,
                        "{c} -> {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_round_trip_dense_grid() {
        // every 5th value, plus every value up to 16 so the linear segment
        // of the sRGB curve and its knee near 10/255 are fully covered
        let mut values: Vec<u8> = (0..=255u8).step_by(5).chain(0..=16).collect();
        values.sort_unstable();
        values.dedup();
        assert_round_trips(&values);
    }

    #[test]
    #[ignore = "16.7M conversions; run with --ignored"]
    fn test_round_trip_full_cube() {
        let values: Vec<u8> = (0..=255u8).collect();
        assert_round_trips(&values);
    }

    #[test]
    fn test_agrees_with_palette_crate() {
        use palette::{white_point::D65, FromColor, Lab as RefLab, Srgb as RefSrgb};

        for &(r, g, b) in &[
            (227u8, 29u8, 66u8),
            (12, 34, 56),
            (255, 255, 0),
            (0, 128, 255),
            (90, 90, 90),
            (1, 2, 3),
        ] {
            let ours = Lab::from(Srgb::new(r, g, b));
            let rgb = RefSrgb::new(r, g, b).into_format::<f64>().into_linear();
            let reference: RefLab<D65, f64> = RefLab::from_color(rgb);
            assert!((ours.l - reference.l).abs() < 0.1, "L for ({r},{g},{b})");
            assert!((ours.a - reference.a).abs() < 0.1, "a for ({r},{g},{b})");
            assert!((ours.b - reference.b).abs() < 0.1, "b for ({r},{g},{b})");
        }
    }
}
