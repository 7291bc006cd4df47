use crate::math::{planar_distance, Point3};

/// A point known to lie on a shape's centerline.
///
/// Produced by shape queries and by the builder when it hands raw drawn
/// points to [`Shape::new`](super::Shape::new), which makes them axis points
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPoint(Point3);

impl AxisPoint {
    /// Wraps a point the caller knows to lie on a centerline.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self(point)
    }

    /// The underlying position.
    #[must_use]
    pub fn point(&self) -> Point3 {
        self.0
    }
}

impl From<AxisPoint> for Point3 {
    fn from(value: AxisPoint) -> Self {
        value.0
    }
}

/// One cross-section of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// Boundary point on the left of the walking direction.
    pub left: Point3,
    /// Centerline point.
    pub centre: AxisPoint,
    /// Boundary point on the right of the walking direction.
    pub right: Point3,
}

impl Joint {
    /// Distance between the two boundary points.
    #[must_use]
    pub fn span(&self) -> f64 {
        planar_distance(&self.left, &self.right)
    }
}

/// A span between two adjacent joints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of `start` within the shape's joints.
    pub index: usize,
    pub start: Joint,
    pub end: Joint,
}

impl Segment {
    /// Footprint quadrilateral, walking the left edge forward and the right edge back.
    #[must_use]
    pub fn quad(&self) -> [Point3; 4] {
        [self.start.left, self.end.left, self.end.right, self.start.right]
    }

    /// Centerline length of the span.
    #[must_use]
    pub fn length(&self) -> f64 {
        planar_distance(&self.start.centre.point(), &self.end.centre.point())
    }
}

/// One of the two open ends of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeEnd {
    /// The first joint.
    Tail,
    /// The last joint.
    Head,
}

impl ShapeEnd {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Tail => Self::Head,
            Self::Head => Self::Tail,
        }
    }
}
