//! Moore-neighbor boundary tracing.

use crate::segment::Region;

/// Pixel coordinate on the image grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed polyline: the first point is repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() >= 2 && first == last,
            _ => false,
        }
    }
}

// Clockwise in screen coordinates (y grows downward): E, SE, S, SW, W, NW, N, NE.
const DX: [i32; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

/// Region membership over the region's bounding box.
struct Mask {
    x0: i32,
    y0: i32,
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl Mask {
    fn new(region: &Region, image_width: usize) -> Self {
        let bbox = region.bbox;
        let (width, height) = (bbox.width(), bbox.height());
        let mut cells = vec![false; width * height];
        for &p in &region.pixels {
            let (x, y) = (p % image_width, p / image_width);
            cells[(y - bbox.y0) * width + (x - bbox.x0)] = true;
        }
        Self {
            x0: bbox.x0 as i32,
            y0: bbox.y0 as i32,
            width: width as i32,
            height: height as i32,
            cells,
        }
    }

    #[inline]
    fn contains(&self, p: Point) -> bool {
        let (x, y) = (p.x - self.x0, p.y - self.y0);
        x >= 0
            && y >= 0
            && x < self.width
            && y < self.height
            && self.cells[(y * self.width + x) as usize]
    }
}

/// Trace the outer boundary of `region` on an image `width` x `height`.
///
/// Starts at the region's first pixel in scan order, approaching from the
/// west, and follows the boundary clockwise. Each step scans the 8
/// neighbors clockwise starting one past the direction it came from and
/// moves to the first member. Tracing ends on returning to the start pixel
/// or after `2 * width * height` steps. Inner holes are not traced.
///
/// A one-pixel region yields `[p, p]`.
pub fn trace_region(region: &Region, width: usize, height: usize) -> Contour {
    let Some(&first) = region.pixels.first() else {
        return Contour::default();
    };
    let mask = Mask::new(region, width);
    let start = Point::new((first % width) as i32, (first / width) as i32);
    let max_steps = 2 * width * height;

    let mut points = vec![start];
    let mut current = start;
    let mut dir = 0usize;

    for _ in 0..max_steps {
        let scan_from = (dir + 5) % 8;
        let next = (0..8).map(|i| (scan_from + i) % 8).find_map(|d| {
            let candidate = Point::new(current.x + DX[d], current.y + DY[d]);
            mask.contains(candidate).then_some((candidate, d))
        });

        let Some((candidate, d)) = next else {
            break;
        };
        if candidate == start {
            break;
        }
        points.push(candidate);
        current = candidate;
        dir = d;
    }

    points.push(start);
    Contour::new(points)
}
