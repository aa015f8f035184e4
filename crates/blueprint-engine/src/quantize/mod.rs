//! Perceptual color quantization
//!
//! Reduces an image's colors to a small palette by k-means clustering in
//! CIE L*a*b*. Clustering is local, not globally optimal: the result depends
//! on the seeded initialization, so the same seed always yields the same
//! palette.

mod kmeans;

pub use kmeans::{kmeans, Clustering, DEFAULT_MAX_ITERATIONS};
