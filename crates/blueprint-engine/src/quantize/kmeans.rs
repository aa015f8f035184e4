//! Lloyd's k-means over LAB colors.

use crate::color::Lab;
use crate::error::EngineError;
use crate::random::SeededRng;

/// Iteration cap used when callers do not choose one.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Result of clustering `n` colors.
///
/// `labels[i]` indexes into `centroids` for input color `i`. Every centroid
/// has at least one member.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub centroids: Vec<Lab>,
    pub labels: Vec<usize>,
}

impl Clustering {
    /// Number of members per centroid.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}

/// Cluster `pixels` into at most `k` groups.
///
/// Initial centroids are `k` distinct pixels chosen by a partial
/// Fisher-Yates shuffle driven by `seed`. Each iteration assigns every pixel
/// to its nearest centroid (first wins on ties) and stops early once no
/// assignment changes. At least one assignment pass always runs, even with
/// `max_iterations == 0`.
///
/// When `k >= pixels.len()` every pixel becomes its own cluster.
///
/// # Errors
///
/// [`EngineError::InvalidInput`] when `k == 0` and `pixels` is non-empty.
pub fn kmeans(
    pixels: &[Lab],
    k: usize,
    max_iterations: usize,
    seed: i64,
) -> Result<Clustering, EngineError> {
    let n = pixels.len();
    if n == 0 {
        return Ok(Clustering {
            centroids: Vec::new(),
            labels: Vec::new(),
        });
    }
    if k == 0 {
        return Err(EngineError::invalid("cluster count must be at least 1"));
    }
    if k >= n {
        return Ok(Clustering {
            centroids: pixels.to_vec(),
            labels: (0..n).collect(),
        });
    }

    let mut centroids = initial_centroids(pixels, k, seed);
    let mut labels = vec![usize::MAX; n];
    let mut iterations = 0;

    for _ in 0..max_iterations.max(1) {
        iterations += 1;
        if !assign(pixels, &centroids, &mut labels) {
            break;
        }
        update_centroids(pixels, &labels, &mut centroids);
    }

    let clustering = compact(centroids, labels);
    tracing::debug!(
        pixels = n,
        requested = k,
        clusters = clustering.centroids.len(),
        iterations,
        "k-means finished"
    );
    Ok(clustering)
}

fn initial_centroids(pixels: &[Lab], k: usize, seed: i64) -> Vec<Lab> {
    let n = pixels.len();
    let mut rng = SeededRng::new(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = i + rng.next_index(n - i);
        indices.swap(i, j);
    }
    indices[..k].iter().map(|&i| pixels[i]).collect()
}

/// Returns whether any label changed.
fn assign(pixels: &[Lab], centroids: &[Lab], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (pixel, label) in pixels.iter().zip(labels.iter_mut()) {
        let nearest = nearest_centroid(pixel, centroids);
        if *label != nearest {
            *label = nearest;
            changed = true;
        }
    }
    changed
}

fn nearest_centroid(pixel: &Lab, centroids: &[Lab]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = pixel.distance_squared(c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn update_centroids(pixels: &[Lab], labels: &[usize], centroids: &mut [Lab]) {
    let mut sums = vec![(0.0f64, 0.0f64, 0.0f64, 0usize); centroids.len()];
    for (pixel, &label) in pixels.iter().zip(labels) {
        let s = &mut sums[label];
        s.0 += pixel.l;
        s.1 += pixel.a;
        s.2 += pixel.b;
        s.3 += 1;
    }
    for (centroid, (l, a, b, count)) in centroids.iter_mut().zip(sums) {
        // empty clusters keep their previous position
        if count > 0 {
            let c = count as f64;
            *centroid = Lab::new(l / c, a / c, b / c);
        }
    }
}

/// Drop memberless centroids and renumber labels, keeping centroid order.
fn compact(centroids: Vec<Lab>, labels: Vec<usize>) -> Clustering {
    let mut used = vec![false; centroids.len()];
    for &label in &labels {
        used[label] = true;
    }
    if used.iter().all(|&u| u) {
        return Clustering { centroids, labels };
    }

    let mut remap = vec![0usize; centroids.len()];
    let mut kept = Vec::with_capacity(centroids.len());
    for (i, centroid) in centroids.into_iter().enumerate() {
        if used[i] {
            remap[i] = kept.len();
            kept.push(centroid);
        }
    }
    Clustering {
        centroids: kept,
        labels: labels.into_iter().map(|l| remap[l]).collect(),
    }
}
