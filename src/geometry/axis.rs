//! Helpers over raw centerline polylines.

use crate::math::distance_2d::{point_on_segment, point_to_segment_dist};
use crate::math::{lerp, planar_distance, planar_eq, Point3, TOLERANCE};

/// Where a point sits on a centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisLocation {
    /// Coincides with the vertex at this index.
    Vertex(usize),
    /// Lies strictly inside the segment starting at this index, at parameter `t`.
    OnSegment(usize, f64),
}

/// Removes consecutive duplicates and interior points lying between their
/// neighbours. Both endpoints survive, so a closed loop stays closed.
#[must_use]
pub fn purify(points: &[Point3]) -> Vec<Point3> {
    let mut result: Vec<Point3> = Vec::with_capacity(points.len());
    for &p in points {
        if result.last().is_some_and(|last| planar_eq(last, &p)) {
            continue;
        }
        while result.len() >= 2 {
            let a = result[result.len() - 2];
            let b = result[result.len() - 1];
            if planar_eq(&a, &p) || point_to_segment_dist(&b, &a, &p) >= TOLERANCE {
                break;
            }
            result.pop();
        }
        result.push(p);
    }
    result
}

/// Cumulative centerline length at every vertex.
#[must_use]
pub fn cumulative_lengths(points: &[Point3]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += planar_distance(&points[i - 1], p);
        }
        lengths.push(total);
    }
    lengths
}

/// Total centerline length.
#[must_use]
pub fn total_length(points: &[Point3]) -> f64 {
    points
        .windows(2)
        .map(|w| planar_distance(&w[0], &w[1]))
        .sum()
}

/// Finds the first vertex or segment the point lies on.
///
/// Vertices take precedence over segment interiors.
#[must_use]
pub fn locate(points: &[Point3], point: &Point3) -> Option<AxisLocation> {
    if let Some(i) = points.iter().position(|p| planar_eq(p, point)) {
        return Some(AxisLocation::Vertex(i));
    }
    points.windows(2).enumerate().find_map(|(i, w)| {
        point_on_segment(point, &w[0], &w[1]).map(|t| AxisLocation::OnSegment(i, t))
    })
}

/// Makes `point` a vertex of the centerline, returning its index.
pub fn insert(points: &mut Vec<Point3>, point: &Point3) -> Option<usize> {
    match locate(points, point)? {
        AxisLocation::Vertex(i) => Some(i),
        AxisLocation::OnSegment(i, t) => {
            let p = lerp(&points[i], &points[i + 1], t);
            points.insert(i + 1, p);
            Some(i + 1)
        }
    }
}

/// Centerline length from the first vertex to `point`.
#[must_use]
pub fn length_at(points: &[Point3], point: &Point3) -> Option<f64> {
    let lengths = cumulative_lengths(points);
    match locate(points, point)? {
        AxisLocation::Vertex(i) => Some(lengths[i]),
        AxisLocation::OnSegment(i, t) => {
            Some(lengths[i] + t * (lengths[i + 1] - lengths[i]))
        }
    }
}

/// The point at centerline length `s`, with the index of the segment it lies
/// on and its parameter there. `s` is clamped to the polyline.
#[must_use]
pub fn point_at_length(points: &[Point3], s: f64) -> Option<(Point3, usize, f64)> {
    let first = *points.first()?;
    if points.len() < 2 || s <= 0.0 {
        return Some((first, 0, 0.0));
    }
    let mut walked = 0.0;
    for (i, w) in points.windows(2).enumerate() {
        let len = planar_distance(&w[0], &w[1]);
        if walked + len >= s - TOLERANCE && len > 0.0 {
            let t = ((s - walked) / len).clamp(0.0, 1.0);
            return Some((lerp(&w[0], &w[1], t), i, t));
        }
        walked += len;
    }
    let last_seg = points.len() - 2;
    Some((points[last_seg + 1], last_seg, 1.0))
}
