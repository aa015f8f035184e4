//! BlueprintBuilder, the primary entry point for the crate.
//!
//! Runs quantize -> segment -> merge -> trace -> simplify -> match over a
//! [`PixelBuffer`] and assembles a [`Blueprint`].

use std::collections::HashMap;
use std::time::Instant;

use super::{Blueprint, PaletteEntry};
use crate::cache::PixelBuffer;
use crate::color::{Lab, Srgb};
use crate::contour::{simplify, trace_region, Contour, DEFAULT_EPSILON};
use crate::error::EngineError;
use crate::quantize::{kmeans, DEFAULT_MAX_ITERATIONS};
use crate::segment::{merge_small_regions, segment, LabelMap};
use crate::thread::ThreadCatalog;

/// Largest palette an indexed preview can hold.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Fluent configuration for blueprint generation.
///
/// Configuration methods consume and return `self`;
/// [`generate()`](Self::generate) takes `&self`, so one builder can serve
/// many images.
///
/// # Example
///
/// ```
/// use blueprint_engine::{BlueprintBuilder, PixelBuffer, Srgb};
///
/// let buffer = PixelBuffer::filled(8, 8, Srgb::new(200, 30, 30)).unwrap();
/// let blueprint = BlueprintBuilder::new(4)
///     .seed(7)
///     .min_region_area(2)
///     .generate(&buffer, None)
///     .unwrap();
///
/// assert_eq!(blueprint.palette.len(), 1);
/// assert_eq!(blueprint.regions.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BlueprintBuilder {
    palette_size: usize,
    seed: i64,
    max_iterations: usize,
    min_region_area: usize,
    merge_small_regions: bool,
    simplify_epsilon: f64,
}

impl BlueprintBuilder {
    /// Defaults: seed 42, 20 iterations, merge regions under 20 pixels,
    /// simplify with a 1 pixel tolerance.
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size,
            seed: 42,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_region_area: 20,
            merge_small_regions: true,
            simplify_epsilon: DEFAULT_EPSILON,
        }
    }

    #[inline]
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[inline]
    pub fn min_region_area(mut self, area: usize) -> Self {
        self.min_region_area = area;
        self
    }

    #[inline]
    pub fn merge_small_regions(mut self, enabled: bool) -> Self {
        self.merge_small_regions = enabled;
        self
    }

    /// Contour simplification tolerance in pixels. Negative values are
    /// treated as 0 (keep every point).
    #[inline]
    pub fn simplify_epsilon(mut self, epsilon: f64) -> Self {
        self.simplify_epsilon = epsilon;
        self
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Build the blueprint for `buffer`.
    ///
    /// With a `catalog`, every palette entry carries its nearest threads.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when the palette size is outside
    /// `1..=256`.
    pub fn generate(
        &self,
        buffer: &PixelBuffer,
        catalog: Option<&ThreadCatalog>,
    ) -> Result<Blueprint, EngineError> {
        if !(1..=MAX_PALETTE_SIZE).contains(&self.palette_size) {
            return Err(EngineError::invalid(format!(
                "palette size must be between 1 and {MAX_PALETTE_SIZE}, got {}",
                self.palette_size
            )));
        }
        let (width, height) = (buffer.width(), buffer.height());
        let started = Instant::now();

        let pixels = to_lab(buffer);
        let clustering = kmeans(&pixels, self.palette_size, self.max_iterations, self.seed)?;
        let quantized_at = Instant::now();

        let mut label_map = LabelMap::new(width, height, clustering.labels);
        let mut regions = segment(&label_map);
        let raw_regions = regions.len();
        if self.merge_small_regions {
            regions = merge_small_regions(&mut label_map, regions, self.min_region_area);
        }
        let segmented_at = Instant::now();

        let epsilon = self.simplify_epsilon.max(0.0);
        for region in &mut regions {
            let outline = trace_region(region, width, height);
            region.contours = vec![Contour::new(simplify(&outline.points, epsilon))];
        }
        let traced_at = Instant::now();

        let counts = label_map.histogram(clustering.centroids.len());
        let total = label_map.len() as f64;
        let palette = clustering
            .centroids
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(index, (&lab, count))| {
                let rgb = lab.to_srgb();
                PaletteEntry {
                    index,
                    rgb,
                    hex: rgb.to_hex(),
                    lab,
                    count,
                    percent: ((count as f64 / total) * 10_000.0).round() / 100.0,
                    thread: catalog.map(|c| c.match_color(rgb)),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            width,
            height,
            colors = palette.len(),
            raw_regions,
            regions = regions.len(),
            quantize_ms = quantized_at.duration_since(started).as_millis() as u64,
            segment_ms = segmented_at.duration_since(quantized_at).as_millis() as u64,
            trace_ms = traced_at.duration_since(segmented_at).as_millis() as u64,
            total_ms = started.elapsed().as_millis() as u64,
            "Blueprint generated"
        );

        Ok(Blueprint {
            width,
            height,
            palette,
            regions,
            label_map,
        })
    }
}

/// Convert every pixel, converting each distinct color only once.
fn to_lab(buffer: &PixelBuffer) -> Vec<Lab> {
    let mut memo: HashMap<Srgb, Lab> = HashMap::new();
    buffer
        .pixels()
        .map(|p| *memo.entry(p).or_insert_with(|| Lab::from(p)))
        .collect()
}
