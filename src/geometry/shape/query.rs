use super::Shape;
use crate::error::{Result, ShapeError};
use crate::geometry::joint::{AxisPoint, Joint, Segment};
use crate::math::distance_2d::project_on_segment;
use crate::math::polygon_2d::{point_in_polygon_2d, segment_direction};
use crate::math::{planar_distance, planar_eq, Point3};

impl Shape {
    /// Returns the segment whose footprint contains `point`, or whose end
    /// centre coincides with it.
    #[must_use]
    pub fn select_segment(&self, point: &Point3) -> Option<Segment> {
        self.segments().into_iter().find(|seg| {
            planar_eq(&seg.start.centre.point(), point)
                || planar_eq(&seg.end.centre.point(), point)
                || point_in_polygon_2d(point, &seg.quad())
        })
    }

    /// Whether `point` lies inside the footprint.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        self.select_segment(point).is_some()
    }

    /// Projects `point` onto the centerline of the segment that contains it.
    ///
    /// Projections within half a width of a joint snap to that joint. On a
    /// non-circular shape, projections within one width of an end snap to the
    /// end. Returns `None` if the point is off the shape.
    #[must_use]
    pub fn get_shape_axis_point(&self, point: &Point3) -> Option<AxisPoint> {
        let seg = self.select_segment(point)?;
        let a = seg.start.centre.point();
        let b = seg.end.centre.point();
        let (projection, t) = project_on_segment(point, &a, &b);

        let half = self.width * 0.5;
        let length = seg.length();
        let from_start = t * length;
        let from_end = length - from_start;
        let mut snapped = if from_start < half && from_start <= from_end {
            a
        } else if from_end < half {
            b
        } else {
            projection
        };

        if !self.is_circular() {
            let ends = [self.joints.first(), self.joints.last()];
            if let Some(end) = ends
                .into_iter()
                .flatten()
                .map(|j| j.centre.point())
                .find(|end| planar_distance(&projection, end) < self.width)
            {
                snapped = end;
            }
        }

        Some(AxisPoint::new(snapped))
    }

    /// Returns the closest point on the left or right boundary edge to a
    /// point lying inside the footprint.
    ///
    /// On a non-circular shape, a point inside the triangular cap at either
    /// end projects onto the end's cross edge instead.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::PointNotOnShape` if no segment contains the point.
    pub fn get_circumreference_point(&self, point: &Point3) -> Result<Point3> {
        let seg = self.select_segment(point).ok_or(ShapeError::PointNotOnShape {
            x: point.x,
            z: point.z,
        })?;

        if !self.is_circular() {
            let last = self.joints.len().saturating_sub(2);
            if seg.index == 0 {
                if let Some(p) = self.cap_projection(&seg.start, &seg.end, point) {
                    return Ok(p);
                }
            }
            if seg.index == last {
                if let Some(p) = self.cap_projection(&seg.end, &seg.start, point) {
                    return Ok(p);
                }
            }
        }

        let (on_left, _) = project_on_segment(point, &seg.start.left, &seg.end.left);
        let (on_right, _) = project_on_segment(point, &seg.start.right, &seg.end.right);
        if planar_distance(point, &on_left) <= planar_distance(point, &on_right) {
            Ok(on_left)
        } else {
            Ok(on_right)
        }
    }

    /// If `point` lies in the cap triangle spanned by the end joint's boundary
    /// points and the centerline point half a width inward, projects it onto
    /// the end's cross edge.
    fn cap_projection(&self, end: &Joint, inner: &Joint, point: &Point3) -> Option<Point3> {
        let centre = end.centre.point();
        let inward = segment_direction(&centre, &inner.centre.point()).ok()?;
        let apex = centre + inward * (self.width * 0.5);
        if !point_in_polygon_2d(point, &[end.left, apex, end.right]) {
            return None;
        }
        Some(project_on_segment(point, &end.left, &end.right).0)
    }
}
