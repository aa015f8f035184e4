//! End-to-end blueprint generation.

mod blueprint;
mod builder;

pub use blueprint::{Blueprint, PaletteEntry};
pub use builder::{BlueprintBuilder, MAX_PALETTE_SIZE};
