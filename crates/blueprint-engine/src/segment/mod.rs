//! Region segmentation
//!
//! Splits a [`LabelMap`] into 4-connected [`Region`]s of equal label and
//! folds regions too small to paint into their dominant neighbor.

mod label_map;
mod merge;
mod region;

pub use label_map::LabelMap;
pub use merge::merge_small_regions;
pub use region::{segment, BBox, Region};
