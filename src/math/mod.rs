pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type, used for texture coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. Roads are laid out on the X/Z plane; Y is elevation.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global tolerance for planar floating-point comparisons.
pub const TOLERANCE: f64 = 1e-6;

/// Distance between two points on the layout plane, ignoring elevation.
#[must_use]
pub fn planar_distance(a: &Point3, b: &Point3) -> f64 {
    ((b.x - a.x).powi(2) + (b.z - a.z).powi(2)).sqrt()
}

/// Whether two points coincide on the layout plane within [`TOLERANCE`].
#[must_use]
pub fn planar_eq(a: &Point3, b: &Point3) -> bool {
    planar_distance(a, b) < TOLERANCE
}

/// Linear interpolation `a + (b - a) * t`.
#[must_use]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_ignores_elevation() {
        let a = Point3::new(0.0, 5.0, 0.0);
        let b = Point3::new(3.0, -2.0, 4.0);
        assert!((planar_distance(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn planar_eq_within_tolerance() {
        let a = Point3::new(1.0, 0.0, 1.0);
        let b = Point3::new(1.0 + TOLERANCE * 0.1, 0.0, 1.0);
        assert!(planar_eq(&a, &b));
        assert!(!planar_eq(&a, &Point3::new(1.1, 0.0, 1.0)));
    }

    #[test]
    fn lerp_midpoint() {
        let m = lerp(&Point3::new(0.0, 0.0, 0.0), &Point3::new(2.0, 0.0, 4.0), 0.5);
        assert_eq!(m, Point3::new(1.0, 0.0, 2.0));
    }
}
