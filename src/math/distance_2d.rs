use super::{Point3, TOLERANCE};

/// Projects `p` onto the segment `a → b` on the layout plane.
///
/// Returns the closest point on the segment and its parameter `t ∈ [0, 1]`.
/// The closest point keeps the segment's elevation.
#[must_use]
pub fn project_on_segment(p: &Point3, a: &Point3, b: &Point3) -> (Point3, f64) {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    let len_sq = dx * dx + dz * dz;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (*a, 0.0);
    }

    let t = ((p.x - a.x) * dx + (p.z - a.z) * dz) / len_sq;
    let t = t.clamp(0.0, 1.0);
    (super::lerp(a, b, t), t)
}

/// Returns the minimum planar distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let (closest, _) = project_on_segment(p, a, b);
    super::planar_distance(p, &closest)
}

/// Returns the parameter of `p` on `a → b` if `p` lies on the segment.
#[must_use]
pub fn point_on_segment(p: &Point3, a: &Point3, b: &Point3) -> Option<f64> {
    let (closest, t) = project_on_segment(p, a, b);
    (super::planar_distance(p, &closest) < TOLERANCE).then_some(t)
}
