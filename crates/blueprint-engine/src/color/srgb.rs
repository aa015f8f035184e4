//! sRGB color type
//!
//! 8-bit gamma-encoded color as stored in image files and thread datasets.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::EngineError;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Not exactly six characters after stripping an optional '#'.
    #[error("invalid hex color length (expected 6 hex digits)")]
    InvalidLength,
    /// A character outside 0-9, a-f, A-F.
    #[error("invalid hex character in {0:?}")]
    InvalidHex(String),
}

impl From<ParseColorError> for EngineError {
    fn from(err: ParseColorError) -> Self {
        EngineError::InvalidInput(err.to_string())
    }
}

/// A color in 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from arbitrary numeric components.
    ///
    /// Components are rounded and clamped to 0..=255. NaN maps to 0.
    ///
    /// ```
    /// use blueprint_engine::Srgb;
    /// assert_eq!(Srgb::clamped(300.0, -4.0, 127.6), Srgb::new(255, 0, 128));
    /// ```
    pub fn clamped(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Uppercase `#RRGGBB` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive, surrounding
    /// whitespace ignored.
    ///
    /// ```
    /// use blueprint_engine::Srgb;
    ///
    /// let red: Srgb = "#E31D42".parse().unwrap();
    /// assert_eq!(red, Srgb::new(0xE3, 0x1D, 0x42));
    /// assert!("#F00".parse::<Srgb>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);

        if digits.chars().count() != 6 {
            return Err(ParseColorError::InvalidLength);
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidHex(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ParseColorError::InvalidHex(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}
