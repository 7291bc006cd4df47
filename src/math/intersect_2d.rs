use super::{Point3, Vector3, TOLERANCE};

/// Parametric line-line intersection on the layout plane.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point3,
    d1: &Vector3,
    p2: &Point3,
    d2: &Vector3,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.z - d1.z * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dz = p2.z - p1.z;
    let t = (dx * d2.z - dz * d2.x) / cross;
    let u = (dx * d1.z - dz * d1.x) / cross;
    Some((t, u))
}

/// Linear interpolation along a direction: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point3, dir: &Vector3, t: f64) -> Point3 {
    Point3::new(origin.x + dir.x * t, origin.y, origin.z + dir.z * t)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_lines_cross() {
        let (t, u) = line_line_intersect_2d(
            &Point3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, -3.0),
            &Vector3::new(0.0, 0.0, 1.0),
        )
        .unwrap();
        assert!((t - 2.0).abs() < 1e-12);
        assert!((u - 3.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_lines_do_not_cross() {
        let hit = line_line_intersect_2d(
            &Point3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
            &Vector3::new(-2.0, 0.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn point_at_keeps_elevation() {
        let q = point_at(&Point3::new(1.0, 3.0, 1.0), &Vector3::new(0.0, 9.0, 1.0), 2.0);
        assert_eq!(q, Point3::new(1.0, 3.0, 3.0));
    }
}
