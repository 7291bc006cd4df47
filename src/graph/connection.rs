use super::NodeId;
use crate::geometry::AxisPoint;

/// A link from one node to a neighbour, at a point both shapes share.
///
/// `connected` is a non-owning key into the [`RoadGraph`](super::RoadGraph)
/// arena; it dangles once the neighbour is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub connected: NodeId,
    pub point: AxisPoint,
}

impl Connection {
    #[must_use]
    pub fn new(connected: NodeId, point: AxisPoint) -> Self {
        Self { connected, point }
    }
}
