mod tessellate_lane;
mod tessellate_shape;

pub use tessellate_lane::TessellateLane;
pub use tessellate_shape::TessellateShape;

use crate::math::{Point2, Point3, Vector3};

/// An ordered vertex list, e.g. a lane centreline.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    /// The ordered vertices of the polyline.
    pub points: Vec<Point3>,
}

/// A triangle mesh approximation of a surface.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}
