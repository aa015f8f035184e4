//! Output types of a blueprint run.

use crate::color::{Lab, Srgb};
use crate::segment::{LabelMap, Region};
use crate::thread::ThreadMatch;

/// One color of a generated palette.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    /// Position in the palette, the value stored in the label map.
    pub index: usize,
    pub rgb: Srgb,
    pub hex: String,
    pub lab: Lab,
    /// Pixels carrying this label after cleanup. May be 0 when every
    /// region of this color was merged away.
    pub count: usize,
    /// Share of the image, 0..=100 with two decimals.
    pub percent: f64,
    pub thread: Option<ThreadMatch>,
}

/// A posterized, segmented and outlined image.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub width: usize,
    pub height: usize,
    pub palette: Vec<PaletteEntry>,
    pub regions: Vec<Region>,
    pub label_map: LabelMap,
}

impl Blueprint {
    /// Label map as 8-bit palette indices, row-major.
    ///
    /// Palettes are capped at 256 colors, so every label fits.
    pub fn preview_indices(&self) -> Vec<u8> {
        self.label_map
            .as_slice()
            .iter()
            .map(|&l| u8::try_from(l).unwrap_or(u8::MAX))
            .collect()
    }

    pub fn palette_colors(&self) -> Vec<Srgb> {
        self.palette.iter().map(|e| e.rgb).collect()
    }

    /// Palette entries still present in the image.
    pub fn used_palette(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.palette.iter().filter(|e| e.count > 0)
    }
}
