//! blueprint-engine: paint-by-number blueprints from photos
//!
//! Turns an RGB image into a small palette of flat colors, a partition of the
//! image into regions of those colors, and a closed outline per region, each
//! color optionally paired with the nearest embroidery thread.
//!
//! # Quick Start
//!
//! The [`BlueprintBuilder`] is the primary entry point:
//!
//! ```
//! use blueprint_engine::{BlueprintBuilder, PixelBuffer, Srgb};
//!
//! let mut data = Vec::new();
//! for y in 0..20 {
//!     for x in 0..20 {
//!         let c = if x < 10 { [220, 20, 20] } else { [20, 20, 220] };
//!         data.extend_from_slice(&c);
//!     }
//! }
//! let buffer = PixelBuffer::new(20, 20, data).unwrap();
//!
//! let blueprint = BlueprintBuilder::new(2).seed(42).generate(&buffer, None).unwrap();
//! assert_eq!(blueprint.regions.len(), 2);
//! ```
//!
//! # Pipeline
//!
//! 1. [`kmeans`] clusters pixel colors in CIE L*a*b* into at most `k`
//!    centroids, seeded by a [`SeededRng`] so runs are reproducible.
//! 2. [`segment`] splits the resulting [`LabelMap`] into 4-connected
//!    [`Region`]s; [`merge_small_regions`] folds specks into their dominant
//!    neighbor.
//! 3. [`trace_region`] walks each region's outer boundary (Moore neighbor
//!    tracing) and [`simplify`] reduces it with Ramer-Douglas-Peucker.
//! 4. [`ThreadCatalog::match_color`] ranks catalog threads by delta E.
//!
//! Decoded images live in an [`ImageCache`] so repeated requests against one
//! photo (resampling, palette tweaks) skip decoding.
//!
//! # Color Science
//!
//! ## Why LAB
//!
//! k-means and thread matching both reduce to "which color is closest".
//! Euclidean distance in sRGB over-weights differences in bright greens and
//! under-weights darks. CIE L*a*b* was built so that equal distances look
//! roughly equally different, and CIE76 delta E (plain Euclidean distance in
//! LAB) is good enough at palette granularity. A delta E near 2.3 is a just
//! noticeable difference; thread matches under 5 look like the same color at
//! stitching distance.
//!
//! ## Conversion chain
//!
//! ```text
//! sRGB u8 -> /255 -> gamma decode -> linear RGB -> D65 matrix -> XYZ -> LAB
//! ```
//!
//! Gamma is decoded with the exact IEC 61966-2-1 formula. The XYZ matrix and
//! white point are the D65 ones (Xn 0.95047, Yn 1.0, Zn 1.08883). The inverse
//! chain rounds and clamps at the end, and round-trips every sRGB color to
//! within one step per channel.
//!
//! ## Averaging
//!
//! Centroids are LAB means. Averaging is done in LAB rather than linear light
//! because the centroid is a representative *perceived* color for painting,
//! not a physically mixed one.

pub mod cache;
pub mod color;
pub mod contour;
pub mod error;
pub mod pipeline;
pub mod quantize;
pub mod random;
pub mod segment;
pub mod thread;

pub use cache::{
    cache_key, fit_within, sample, CacheStats, CachedImage, Clock, ImageCache, ImageSource,
    PixelBuffer, RasterCodec, Registration, TickClock,
};
pub use color::{Lab, LinearRgb, ParseColorError, Srgb, Xyz};
pub use contour::{simplify, trace_region, Contour, Point};
pub use error::EngineError;
pub use pipeline::{Blueprint, BlueprintBuilder, PaletteEntry, MAX_PALETTE_SIZE};
pub use quantize::{kmeans, Clustering};
pub use random::SeededRng;
pub use segment::{merge_small_regions, segment, BBox, LabelMap, Region};
pub use thread::{match_thread, ColorQuery, DmcThread, ThreadCandidate, ThreadCatalog, ThreadMatch};
