//! Connected-component labeling.

use super::LabelMap;
use crate::contour::Contour;

/// Axis-aligned bounds, max exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl BBox {
    #[inline]
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// A 4-connected set of pixels sharing one label.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub label_index: usize,
    /// Linear pixel indices, ascending.
    pub pixels: Vec<usize>,
    pub area_px: usize,
    pub bbox: BBox,
    /// Outlines, filled in by the vectorizer.
    pub contours: Vec<Contour>,
}

/// Label every 4-connected component of `map`.
///
/// Regions come back ordered by their smallest pixel index. Together they
/// cover each pixel exactly once.
pub fn segment(map: &LabelMap) -> Vec<Region> {
    let width = map.width();
    let labels = map.as_slice();
    let mut visited = vec![false; labels.len()];
    let mut stack = Vec::new();
    let mut regions = Vec::new();

    for seed in 0..labels.len() {
        if visited[seed] {
            continue;
        }
        let label = labels[seed];
        visited[seed] = true;
        stack.push(seed);

        let mut pixels = Vec::new();
        let mut bbox = BBox {
            x0: usize::MAX,
            y0: usize::MAX,
            x1: 0,
            y1: 0,
        };

        while let Some(index) = stack.pop() {
            pixels.push(index);
            let (x, y) = (index % width, index / width);
            bbox.x0 = bbox.x0.min(x);
            bbox.y0 = bbox.y0.min(y);
            bbox.x1 = bbox.x1.max(x + 1);
            bbox.y1 = bbox.y1.max(y + 1);

            for n in map.neighbors4(index) {
                if !visited[n] && labels[n] == label {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }

        pixels.sort_unstable();
        regions.push(Region {
            label_index: label,
            area_px: pixels.len(),
            pixels,
            bbox,
            contours: Vec::new(),
        });
    }

    debug_assert_eq!(
        regions.iter().map(|r| r.area_px).sum::<usize>(),
        labels.len()
    );
    regions
}
