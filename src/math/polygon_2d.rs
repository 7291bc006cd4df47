use super::distance_2d::point_to_segment_dist;
use super::{Point3, Vector3, TOLERANCE};
use crate::error::{Result, ShapeError};

/// Computes the normalized planar direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `ShapeError::Degenerate` if the segment has zero length.
pub fn segment_direction(a: &Point3, b: &Point3) -> Result<Vector3> {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    let len = (dx * dx + dz * dz).sqrt();
    if len < TOLERANCE {
        return Err(ShapeError::Degenerate(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.z, b.x, b.z
        ))
        .into());
    }
    Ok(Vector3::new(dx / len, 0.0, dz / len))
}

/// Returns the left-pointing normal of a planar direction.
#[must_use]
pub fn left_normal(dir: &Vector3) -> Vector3 {
    Vector3::new(dir.z, 0.0, -dir.x)
}

/// Point-in-polygon test on the layout plane (even-odd rule).
///
/// Points on the boundary count as inside.
#[must_use]
pub fn point_in_polygon_2d(point: &Point3, polygon: &[Point3]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        if point_to_segment_dist(point, a, b) < TOLERANCE {
            return true;
        }
        if (a.z > point.z) != (b.z > point.z) {
            let x_cross = a.x + (point.z - a.z) / (b.z - a.z) * (b.x - a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}
