use super::{Connection, NodeId};
use crate::geometry::{Joint, Shape};
use crate::math::intersect_2d::{line_line_intersect_2d, point_at};
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{lerp, planar_distance, Point3, Vector3, TOLERANCE};

/// Which half of the road a lane runs on, relative to the shape's tail→head direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Runs head → tail.
    Left,
    /// Runs tail → head.
    Right,
}

/// A directed drivable polyline on one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    /// The node this lane belongs to.
    pub node: NodeId,
    /// Lane number on its side, 0 being the outermost.
    pub index: usize,
    pub side: Side,
    pub points: Vec<Point3>,
    pub connects_from: Option<NodeId>,
    pub connects_to: Option<NodeId>,
}

impl Lane {
    /// Whether a vehicle leaving this lane continues on `next`.
    #[must_use]
    pub fn leads_into(&self, next: &Lane) -> bool {
        self.connects_to == Some(next.node)
            && next.connects_from == Some(self.node)
            && self.index == next.index
    }

    #[must_use]
    pub fn first_point(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    #[must_use]
    pub fn last_point(&self) -> Option<Point3> {
        self.points.last().copied()
    }
}

/// Fraction of the way from the edge to the axis at which lane `index` runs.
#[allow(clippy::cast_precision_loss)]
fn lane_fraction(index: usize, lanes_per_side: usize) -> f64 {
    (index as f64 + 0.5) / lanes_per_side as f64
}

/// The neighbour whose connection point is closest to `point`, within `reach`.
fn connection_near(connections: &[Connection], point: &Point3, reach: f64) -> Option<NodeId> {
    connections
        .iter()
        .map(|c| (c.connected, planar_distance(&c.point.point(), point)))
        .filter(|(_, d)| *d <= reach)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Lanes running along a shape's skeleton, on both sides.
pub(crate) fn skeleton_lanes(
    node: NodeId,
    shape: &Shape,
    connections: &[Connection],
    lanes_per_side: usize,
) -> Vec<Lane> {
    if shape.is_empty() {
        return Vec::new();
    }
    // A lane end belongs to a connection lying within its end joint.
    let reach = |joint: Option<&Joint>| joint.map_or(0.0, Joint::span) * 0.5 + TOLERANCE;
    let tail_reach = reach(shape.joints().first());
    let head_reach = reach(shape.joints().last());
    let mut lanes = Vec::with_capacity(lanes_per_side * 2);

    for side in [Side::Right, Side::Left] {
        for index in 0..lanes_per_side {
            let f = lane_fraction(index, lanes_per_side);
            let mut points: Vec<Point3> = shape
                .joints()
                .iter()
                .map(|j| {
                    let edge = match side {
                        Side::Right => j.right,
                        Side::Left => j.left,
                    };
                    lerp(&edge, &j.centre.point(), f)
                })
                .collect();
            let (from_reach, to_reach) = match side {
                Side::Right => (tail_reach, head_reach),
                Side::Left => {
                    points.reverse();
                    (head_reach, tail_reach)
                }
            };
            let connects_from = points
                .first()
                .and_then(|p| connection_near(connections, p, from_reach));
            let connects_to = points
                .last()
                .and_then(|p| connection_near(connections, p, to_reach));
            lanes.push(Lane {
                node,
                index,
                side,
                points,
                connects_from,
                connects_to,
            });
        }
    }
    lanes
}

/// Lanes crossing a junction, one per ordered pair of distinct neighbours
/// and lane number.
///
/// Each lane enters on the right of the inbound direction, leaves on the
/// right of the outbound one and bends where the two lines cross.
pub(crate) fn junction_lanes(
    node: NodeId,
    shape: &Shape,
    connections: &[Connection],
    lanes_per_side: usize,
) -> Vec<Lane> {
    let mut axis = shape.axis_points();
    if shape.is_circular() {
        axis.pop();
    }
    if axis.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let count = axis.len() as f64;
    let centre = Point3::from(
        axis.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / count,
    );
    let half = shape.width() * 0.5;

    let mut lanes = Vec::new();
    for from in connections {
        for to in connections {
            if from.connected == to.connected {
                continue;
            }
            let (Ok(inbound), Ok(outbound)) = (
                segment_direction(&from.point.point(), &centre),
                segment_direction(&centre, &to.point.point()),
            ) else {
                continue;
            };
            for index in 0..lanes_per_side {
                let offset = half * (1.0 - lane_fraction(index, lanes_per_side));
                let start = from.point.point() - left_normal(&inbound) * offset;
                let end = to.point.point() - left_normal(&outbound) * offset;
                let mut points = vec![start];
                if let Some((t, u)) = line_line_intersect_2d(&start, &inbound, &end, &outbound) {
                    if t > TOLERANCE && u < -TOLERANCE {
                        points.push(point_at(&start, &inbound, t));
                    }
                }
                points.push(end);
                lanes.push(Lane {
                    node,
                    index,
                    side: Side::Right,
                    points,
                    connects_from: Some(from.connected),
                    connects_to: Some(to.connected),
                });
            }
        }
    }
    lanes
}
