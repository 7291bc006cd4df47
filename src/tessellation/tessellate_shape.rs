use crate::error::{Result, ShapeError};
use crate::geometry::{axis, Shape};
use crate::math::{Point2, Vector3};

use super::TriangleMesh;

/// Up direction for the road surface (Y+).
const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);

/// Generates the flat road surface mesh of a shape.
///
/// Every joint contributes its left and right boundary points, so the mesh
/// follows the shape's joints exactly. U runs from 0 on the left edge
/// to 1 on the right edge; V is the centerline length travelled from the
/// tail, so a texture repeats once per world unit along the road.
#[derive(Debug)]
pub struct TessellateShape<'a> {
    shape: &'a Shape,
}

impl<'a> TessellateShape<'a> {
    /// Creates a new shape tessellation operation.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the tessellation, producing a ribbon mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape has fewer than 2 joints.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<TriangleMesh> {
        let joints = self.shape.joints();
        let n = joints.len();
        if n < 2 {
            return Err(ShapeError::Degenerate(
                "at least 2 joints are required for surface tessellation".to_owned(),
            )
            .into());
        }

        let travelled = axis::cumulative_lengths(&self.shape.axis_points());

        let mut vertices = Vec::with_capacity(n * 2);
        let mut normals = Vec::with_capacity(n * 2);
        let mut uvs = Vec::with_capacity(n * 2);
        for (joint, &v) in joints.iter().zip(&travelled) {
            vertices.extend_from_slice(&[joint.left, joint.right]);
            normals.extend_from_slice(&[UP, UP]);
            uvs.extend_from_slice(&[Point2::new(0.0, v), Point2::new(1.0, v)]);
        }

        // Two triangles per segment, counter-clockwise seen from above.
        let mut indices = Vec::with_capacity((n - 1) * 2);
        for i in 0..n - 1 {
            let left = (i * 2) as u32;
            let right = left + 1;
            let next_left = left + 2;
            let next_right = left + 3;
            indices.push([left, right, next_left]);
            indices.push([right, next_right, next_left]);
        }

        Ok(TriangleMesh {
            vertices,
            normals,
            uvs,
            indices,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    #[test]
    fn straight_road_two_joints() {
        let shape = Shape::new(&[p(0.0, 0.0), p(10.0, 0.0)], 4.0, None, None);
        let mesh = TessellateShape::new(&shape).execute().unwrap();

        // 2 joints -> 4 vertices, 2 triangles
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 2);

        // Left of +X is -Z.
        assert_eq!(mesh.vertices[0], p(0.0, -2.0));
        assert_eq!(mesh.vertices[1], p(0.0, 2.0));
    }

    #[test]
    fn triangles_face_up() {
        let shape = Shape::new(
            &[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(20.0, 10.0)],
            4.0,
            None,
            None,
        );
        let mesh = TessellateShape::new(&shape).execute().unwrap();
        assert_eq!(mesh.indices.len(), 6);
        for tri in &mesh.indices {
            let a = mesh.vertices[tri[0] as usize];
            let b = mesh.vertices[tri[1] as usize];
            let c = mesh.vertices[tri[2] as usize];
            let normal = (b - a).cross(&(c - a));
            assert!(normal.y > 0.0, "triangle {tri:?} faces down");
        }
        for normal in &mesh.normals {
            assert_eq!(*normal, UP);
        }
    }

    #[test]
    fn uvs_follow_travelled_length() {
        let shape = Shape::new(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 5.0)], 2.0, None, None);
        let mesh = TessellateShape::new(&shape).execute().unwrap();

        assert!((mesh.uvs[0].x).abs() < 1e-10);
        assert!((mesh.uvs[1].x - 1.0).abs() < 1e-10);
        assert!((mesh.uvs[2].y - 10.0).abs() < 1e-10);
        assert!((mesh.uvs[5].y - 15.0).abs() < 1e-10);
    }

    #[test]
    fn single_joint_fails() {
        let shape = Shape::new(&[p(0.0, 0.0)], 4.0, None, None);
        assert!(TessellateShape::new(&shape).execute().is_err());
    }
}
