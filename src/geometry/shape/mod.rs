mod edit;
mod query;

pub use edit::ShapeCut;

use super::axis;
use super::joint::{AxisPoint, Joint, Segment, ShapeEnd};
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{planar_eq, Point3, Vector3, TOLERANCE};

/// Width-extruded centerline describing one road's drivable footprint.
///
/// A shape is rebuilt wholesale from its centerline on every edit. Its
/// centerline never holds consecutive duplicates nor interior points lying
/// between their neighbours.
///
/// # Joints
///
/// Each joint is a cross-section along the bisector of the incoming and
/// outgoing segments, which is where their offset lines meet. Its boundary
/// points sit half a width either side of the centre, so every joint spans
/// exactly the shape's width whatever the turn angle. At an open end the
/// missing direction comes from the end's direction point if one is set,
/// otherwise the end is cut square. A circular shape wraps its direction
/// lookups around the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    width: f64,
    joints: Vec<Joint>,
    tail_direction: Option<Point3>,
    head_direction: Option<Point3>,
}

impl Shape {
    /// Builds a shape from centerline points.
    ///
    /// `tail_direction` is a point before the first centerline point and
    /// `head_direction` a point past the last one; they orient the end joints.
    #[must_use]
    pub fn new(
        axis: &[Point3],
        width: f64,
        tail_direction: Option<Point3>,
        head_direction: Option<Point3>,
    ) -> Self {
        let mut shape = Self {
            width,
            joints: Vec::new(),
            tail_direction,
            head_direction,
        };
        shape.rebuild(axis);
        shape
    }

    /// Replaces the centerline and recomputes every joint.
    fn rebuild(&mut self, axis: &[Point3]) {
        let axis = axis::purify(axis);
        self.joints = build_joints(
            &axis,
            self.width,
            self.tail_direction.as_ref(),
            self.head_direction.as_ref(),
        );
    }

    fn clear(&mut self) {
        self.joints.clear();
        self.tail_direction = None;
        self.head_direction = None;
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[must_use]
    pub fn tail_direction(&self) -> Option<Point3> {
        self.tail_direction
    }

    #[must_use]
    pub fn head_direction(&self) -> Option<Point3> {
        self.head_direction
    }

    /// A shape emptied by [`Shape::cut`] has no joints and must be discarded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Whether the first and last joint centres coincide.
    #[must_use]
    pub fn is_circular(&self) -> bool {
        match (self.joints.first(), self.joints.last()) {
            (Some(first), Some(last)) if self.joints.len() >= 3 => {
                planar_eq(&first.centre.point(), &last.centre.point())
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn axis_points(&self) -> Vec<Point3> {
        self.joints.iter().map(|j| j.centre.point()).collect()
    }

    #[must_use]
    pub fn left_points(&self) -> Vec<Point3> {
        self.joints.iter().map(|j| j.left).collect()
    }

    #[must_use]
    pub fn right_points(&self) -> Vec<Point3> {
        self.joints.iter().map(|j| j.right).collect()
    }

    /// The joint at the given end.
    #[must_use]
    pub fn end_joint(&self, end: ShapeEnd) -> Option<&Joint> {
        match end {
            ShapeEnd::Tail => self.joints.first(),
            ShapeEnd::Head => self.joints.last(),
        }
    }

    /// The centerline point at the given end.
    #[must_use]
    pub fn end_point(&self, end: ShapeEnd) -> Option<AxisPoint> {
        self.end_joint(end).map(|j| j.centre)
    }

    /// Which open end, if any, the point coincides with. Circular shapes have none.
    #[must_use]
    pub fn end_at(&self, point: &Point3) -> Option<ShapeEnd> {
        if self.is_circular() {
            return None;
        }
        [ShapeEnd::Tail, ShapeEnd::Head]
            .into_iter()
            .find(|&end| self.end_point(end).is_some_and(|p| planar_eq(&p.point(), point)))
    }

    /// Adjacent joint pairs, in order.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        self.joints
            .windows(2)
            .enumerate()
            .map(|(index, w)| Segment {
                index,
                start: w[0],
                end: w[1],
            })
            .collect()
    }

    /// Total centerline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        axis::total_length(&self.axis_points())
    }

    /// Centerline length from the tail to `point`, if it lies on the centerline.
    #[must_use]
    pub fn length_at(&self, point: &Point3) -> Option<f64> {
        axis::length_at(&self.axis_points(), point)
    }

    /// The centerline point `s` along from the tail (clamped to the shape).
    #[must_use]
    pub fn point_at_length(&self, s: f64) -> Option<AxisPoint> {
        axis::point_at_length(&self.axis_points(), s).map(|(p, _, _)| AxisPoint::new(p))
    }

    /// The same footprint walked from head to tail.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut axis = self.axis_points();
        axis.reverse();
        Self::new(&axis, self.width, self.head_direction, self.tail_direction)
    }
}

fn build_joints(
    axis: &[Point3],
    width: f64,
    tail_direction: Option<&Point3>,
    head_direction: Option<&Point3>,
) -> Vec<Joint> {
    let n = axis.len();
    let half = width * 0.5;

    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        let centre = axis[0];
        let dir = tail_direction
            .and_then(|t| segment_direction(t, &centre).ok())
            .or_else(|| head_direction.and_then(|h| segment_direction(&centre, h).ok()))
            .unwrap_or_else(Vector3::x);
        let offset = left_normal(&dir) * half;
        return vec![Joint {
            left: centre + offset,
            centre: AxisPoint::new(centre),
            right: centre - offset,
        }];
    }

    // Purified centerlines have no zero-length segments.
    let mut directions: Vec<Vector3> = Vec::with_capacity(n - 1);
    for w in axis.windows(2) {
        let fallback = directions.last().copied().unwrap_or_else(Vector3::x);
        directions.push(segment_direction(&w[0], &w[1]).unwrap_or(fallback));
    }

    let circular = n >= 3 && planar_eq(&axis[0], &axis[n - 1]);
    let first_dir = directions[0];
    let last_dir = directions[n - 2];

    axis.iter()
        .enumerate()
        .map(|(i, &centre)| {
            let incoming = if i > 0 {
                directions[i - 1]
            } else if circular {
                last_dir
            } else {
                tail_direction
                    .and_then(|t| segment_direction(t, &centre).ok())
                    .unwrap_or(first_dir)
            };
            let outgoing = if i < n - 1 {
                directions[i]
            } else if circular {
                first_dir
            } else {
                head_direction
                    .and_then(|h| segment_direction(&centre, h).ok())
                    .unwrap_or(last_dir)
            };
            let offset = cross_section(&incoming, &outgoing) * half;
            Joint {
                left: centre + offset,
                centre: AxisPoint::new(centre),
                right: centre - offset,
            }
        })
        .collect()
}

/// Unit vector pointing left across a joint: the bisector of the left
/// normals of the incoming and outgoing directions.
fn cross_section(incoming: &Vector3, outgoing: &Vector3) -> Vector3 {
    let sum = left_normal(incoming) + left_normal(outgoing);
    let norm = sum.norm();
    // A full reversal has no bisector; keep the incoming side.
    if norm < TOLERANCE {
        left_normal(incoming)
    } else {
        sum / norm
    }
}
