//! Node-level route search and lane-level path resolution.

mod lane_path;
mod road_routes;

pub use lane_path::FindLaneOnRoute;
pub use road_routes::CreateRoadRoutes;

use crate::graph::{Lane, NodeId};
use crate::math::{planar_eq, Point3};

/// A repeat-free sequence of nodes, each linked to the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(Vec<NodeId>);

impl Route {
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.0.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }
}

impl From<Vec<NodeId>> for Route {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }
}

/// The lane a vehicle drives on one node of a route, and the lane it moves
/// over to before leaving, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelSegment {
    pub node: NodeId,
    pub lane: Lane,
    pub switch_lane: Option<Lane>,
}

impl TravelSegment {
    #[must_use]
    pub fn new(node: NodeId, lane: Lane) -> Self {
        Self {
            node,
            lane,
            switch_lane: None,
        }
    }

    /// The lane the vehicle is on when it leaves the node.
    #[must_use]
    pub fn effective_lane(&self) -> &Lane {
        self.switch_lane.as_ref().unwrap_or(&self.lane)
    }
}

/// Flattens a resolved path into the points a vehicle follows.
///
/// A lane switch jumps from the first point of the entry lane onto the switch
/// lane. Consecutive coincident points are collapsed.
#[must_use]
pub fn travel_points(segments: &[TravelSegment]) -> Vec<Point3> {
    let mut points = Vec::new();
    for segment in segments {
        match &segment.switch_lane {
            Some(switch) => {
                points.extend(segment.lane.first_point());
                points.extend_from_slice(&switch.points);
            }
            None => points.extend_from_slice(&segment.lane.points),
        }
    }
    points.dedup_by(|a, b| planar_eq(a, b));
    points
}
