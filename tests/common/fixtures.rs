//! Test fixtures: small encoded images.

use base64::Engine;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
/// DMC 666 Bright Red
pub const BRIGHT_RED: [u8; 3] = [0xE3, 0x1D, 0x42];

fn png(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    out.into_inner()
}

/// Single-color PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    png(&RgbImage::from_pixel(width, height, Rgb(color)))
}

/// PNG with `left` in the left half and `right` in the right half
pub fn split_png(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> Vec<u8> {
    png(&RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb(left)
        } else {
            Rgb(right)
        }
    }))
}

/// Solid background with a `side`-pixel square of `speck` at (`x0`, `y0`)
pub fn speck_png(
    width: u32,
    height: u32,
    background: [u8; 3],
    speck: [u8; 3],
    (x0, y0, side): (u32, u32, u32),
) -> Vec<u8> {
    png(&RgbImage::from_fn(width, height, |x, y| {
        if (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y) {
            Rgb(speck)
        } else {
            Rgb(background)
        }
    }))
}

/// Base64 of raw bytes, as the API expects image fields
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
