//! Ramer-Douglas-Peucker polyline simplification.

use super::trace::Point;

/// Tolerance in pixels applied when callers do not choose one.
pub const DEFAULT_EPSILON: f64 = 1.0;

/// Longest input handled by the recursive form; beyond it an explicit stack
/// bounds the call depth.
const RECURSION_LIMIT: usize = 2048;

/// Drop points that deviate less than `epsilon` from the chord between
/// their kept neighbors.
///
/// The first and last points always survive, so a closed contour stays
/// closed. For a chord with equal endpoints the deviation is the distance
/// to that endpoint.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    if points.len() <= RECURSION_LIMIT {
        simplify_recursive(points, epsilon)
    } else {
        simplify_iterative(points, epsilon)
    }
}

fn simplify_recursive(points: &[Point], epsilon: f64) -> Vec<Point> {
    let mut out = Vec::new();
    recurse(points, epsilon, &mut out);
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

// Pushes every kept point of `points` except the last.
fn recurse(points: &[Point], epsilon: f64, out: &mut Vec<Point>) {
    let last = points.len() - 1;
    match farthest(points, 0, last) {
        Some((index, distance)) if distance > epsilon => {
            recurse(&points[..=index], epsilon, out);
            recurse(&points[index..], epsilon, out);
        }
        _ => out.push(points[0]),
    }
}

fn simplify_iterative(points: &[Point], epsilon: f64) -> Vec<Point> {
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if let Some((index, distance)) = farthest(points, start, end) {
            if distance > epsilon {
                keep[index] = true;
                stack.push((index, end));
                stack.push((start, index));
            }
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Interior point of `points[start..=end]` farthest from the chord, first
/// one on ties. `None` when there is no interior point.
fn farthest(points: &[Point], start: usize, end: usize) -> Option<(usize, f64)> {
    let (a, b) = (points[start], points[end]);
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = deviation(p, a, b);
        if best.map_or(true, |(_, bd)| d > bd) {
            best = Some((i, d));
        }
    }
    best
}

fn deviation(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let (dx, dy) = (bx - ax, by - ay);
    let chord = dx.hypot(dy);
    if chord == 0.0 {
        return (px - ax).hypot(py - ay);
    }
    ((px - ax) * dy - (py - ay) * dx).abs() / chord
}
