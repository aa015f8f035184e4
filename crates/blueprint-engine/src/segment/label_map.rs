//! Per-pixel cluster indices.

/// One palette index per pixel, row-major.
///
/// Construction panics on an empty grid or a length that disagrees with the
/// dimensions: both can only come from a bug upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: usize,
    height: usize,
    labels: Vec<usize>,
}

impl LabelMap {
    pub fn new(width: usize, height: usize, labels: Vec<usize>) -> Self {
        assert!(width > 0 && height > 0, "label map must not be empty");
        assert_eq!(
            labels.len(),
            width * height,
            "label map length does not match {width}x{height}"
        );
        Self {
            width,
            height,
            labels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; an empty map cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> usize {
        self.labels[y * self.width + x]
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, label: usize) {
        self.labels[index] = label;
    }

    /// Linear indices of the 4-neighbors of `index` that lie inside the grid.
    pub(crate) fn neighbors4(&self, index: usize) -> impl Iterator<Item = usize> {
        let (x, y) = (index % self.width, index / self.width);
        let w = self.width;
        let h = self.height;
        [
            (y > 0).then(|| index - w),
            (x > 0).then(|| index - 1),
            (x + 1 < w).then(|| index + 1),
            (y + 1 < h).then(|| index + w),
        ]
        .into_iter()
        .flatten()
    }

    /// Occurrences of each label in `0..label_count`.
    pub fn histogram(&self, label_count: usize) -> Vec<usize> {
        let mut counts = vec![0usize; label_count];
        for &label in &self.labels {
            if let Some(c) = counts.get_mut(label) {
                *c += 1;
            }
        }
        counts
    }
}
