use super::connection::Connection;
use super::grid::GridPlacement;
use super::lanes::{junction_lanes, skeleton_lanes, Lane};
use crate::geometry::Shape;

slotmap::new_key_type! {
    /// Unique identifier for a node in the road graph.
    pub struct NodeId;
}

/// The fixed set of road pieces a network is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A straight or free-drawn road.
    Road,
    /// A quarter-turn tile.
    Curve,
    /// A junction joining three or more roads.
    Intersection,
    /// A dead end where vehicles enter and leave the network.
    Spawner,
}

impl NodeKind {
    /// Whether a vehicle may change lanes while on a node of this kind.
    #[must_use]
    pub fn can_switch_lanes(self) -> bool {
        matches!(self, Self::Road | Self::Curve)
    }
}

/// One road piece: a shape, its links to neighbouring nodes and the lanes
/// derived from both.
#[derive(Debug, Clone)]
pub struct RoadNode {
    id: NodeId,
    kind: NodeKind,
    shape: Shape,
    connections: Vec<Connection>,
    placement: Option<GridPlacement>,
    lanes: Vec<Lane>,
}

impl RoadNode {
    pub(crate) fn new(
        id: NodeId,
        kind: NodeKind,
        shape: Shape,
        placement: Option<GridPlacement>,
    ) -> Self {
        Self {
            id,
            kind,
            shape,
            connections: Vec::new(),
            placement,
            lanes: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn placement(&self) -> Option<GridPlacement> {
        self.placement
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[must_use]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    #[must_use]
    pub fn can_switch_lanes(&self) -> bool {
        self.kind.can_switch_lanes()
    }

    /// Neighbour ids in connection order.
    #[must_use]
    pub fn neighbours(&self) -> Vec<NodeId> {
        self.connections.iter().map(|c| c.connected).collect()
    }

    #[must_use]
    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.connection_to(other).is_some()
    }

    #[must_use]
    pub fn connection_to(&self, other: NodeId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.connected == other)
    }

    /// Adds a one-sided link. Returns `false` if this node already links to
    /// the same neighbour.
    pub(crate) fn add_connection(&mut self, connection: Connection) -> bool {
        if connection.connected == self.id || self.is_connected_to(connection.connected) {
            return false;
        }
        self.connections.push(connection);
        true
    }

    /// Drops the one-sided link to `other`, if any.
    pub(crate) fn dismiss_connection(&mut self, other: NodeId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.connected == other)?;
        Some(self.connections.remove(index))
    }

    /// Removes and returns every link matching `predicate`.
    pub(crate) fn take_connections<F>(&mut self, predicate: F) -> Vec<Connection>
    where
        F: Fn(&Connection) -> bool,
    {
        let (taken, kept): (Vec<_>, Vec<_>) =
            self.connections.drain(..).partition(|c| predicate(c));
        self.connections = kept;
        taken
    }

    pub(crate) fn retarget_connection(&mut self, from: NodeId, to: NodeId) {
        if let Some(c) = self.connections.iter_mut().find(|c| c.connected == from) {
            c.connected = to;
        }
    }

    pub(crate) fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// Rebuilds the lanes from the current shape and connections.
    pub(crate) fn create_lanes(&mut self, lanes_per_side: usize) {
        self.lanes = match self.kind {
            NodeKind::Intersection => {
                junction_lanes(self.id, &self.shape, &self.connections, lanes_per_side)
            }
            NodeKind::Road | NodeKind::Curve | NodeKind::Spawner => {
                skeleton_lanes(self.id, &self.shape, &self.connections, lanes_per_side)
            }
        };
    }

    /// Whether `lane` is one of this node's current lanes.
    #[must_use]
    pub fn owns_lane(&self, lane: &Lane) -> bool {
        lane.node == self.id && self.lanes.contains(lane)
    }

    /// Lanes whose last point lies on the connection to `other`.
    #[must_use]
    pub fn get_all_lanes_connecting_to(&self, other: NodeId) -> Vec<&Lane> {
        self.lanes
            .iter()
            .filter(|l| l.connects_to == Some(other))
            .collect()
    }

    /// Lanes whose first point lies on the connection to `other`.
    #[must_use]
    pub fn get_all_lanes_connecting_from(&self, other: NodeId) -> Vec<&Lane> {
        self.lanes
            .iter()
            .filter(|l| l.connects_from == Some(other))
            .collect()
    }

    /// This node's lanes a vehicle can enter when leaving `previous`, a lane of
    /// a neighbouring node.
    #[must_use]
    pub fn get_subsequent_lanes_connecting_from_lane(&self, previous: &Lane) -> Vec<&Lane> {
        self.lanes.iter().filter(|l| previous.leads_into(l)).collect()
    }

    /// This node's lanes that lead into `next`, a lane of a neighbouring node.
    #[must_use]
    pub fn get_subsequent_lanes_connecting_to_lane(&self, next: &Lane) -> Vec<&Lane> {
        self.lanes.iter().filter(|l| l.leads_into(next)).collect()
    }

    /// Lanes a vehicle on `lane` can move over to without leaving this node.
    /// Empty on nodes that do not allow lane changes.
    #[must_use]
    pub fn switch_candidates(&self, lane: &Lane) -> Vec<&Lane> {
        if !self.can_switch_lanes() {
            return Vec::new();
        }
        self.lanes
            .iter()
            .filter(|l| l.side == lane.side && l.index != lane.index)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::AxisPoint;
    use crate::graph::lanes::Side;
    use crate::math::Point3;
    use slotmap::SlotMap;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    fn road(ids: &mut SlotMap<NodeId, ()>) -> RoadNode {
        let id = ids.insert(());
        let shape = Shape::new(&[p(0.0, 0.0), p(10.0, 0.0)], 4.0, None, None);
        RoadNode::new(id, NodeKind::Road, shape, None)
    }

    #[test]
    fn switching_allowed_only_on_plain_roads() {
        assert!(NodeKind::Road.can_switch_lanes());
        assert!(NodeKind::Curve.can_switch_lanes());
        assert!(!NodeKind::Intersection.can_switch_lanes());
        assert!(!NodeKind::Spawner.can_switch_lanes());
    }

    #[test]
    fn duplicate_and_self_connections_are_refused() {
        let mut ids = SlotMap::with_key();
        let mut node = road(&mut ids);
        let other = ids.insert(());
        let at = AxisPoint::new(p(10.0, 0.0));
        assert!(node.add_connection(Connection::new(other, at)));
        assert!(!node.add_connection(Connection::new(other, at)));
        assert!(!node.add_connection(Connection::new(node.id(), at)));
        assert_eq!(node.connections().len(), 1);
        assert!(node.dismiss_connection(other).is_some());
        assert!(node.dismiss_connection(other).is_none());
    }

    #[test]
    fn take_connections_partitions() {
        let mut ids = SlotMap::with_key();
        let mut node = road(&mut ids);
        let a = ids.insert(());
        let b = ids.insert(());
        node.add_connection(Connection::new(a, AxisPoint::new(p(0.0, 0.0))));
        node.add_connection(Connection::new(b, AxisPoint::new(p(10.0, 0.0))));
        let taken = node.take_connections(|c| c.point.point().x > 5.0);
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].connected, b);
        assert_eq!(node.neighbours(), vec![a]);
    }

    #[test]
    fn lane_queries_follow_connections() {
        let mut ids = SlotMap::with_key();
        let mut node = road(&mut ids);
        let west = ids.insert(());
        let east = ids.insert(());
        node.add_connection(Connection::new(west, AxisPoint::new(p(0.0, 0.0))));
        node.add_connection(Connection::new(east, AxisPoint::new(p(10.0, 0.0))));
        node.create_lanes(2);
        assert_eq!(node.lanes().len(), 4);

        let eastbound = node.get_all_lanes_connecting_to(east);
        assert_eq!(eastbound.len(), 2);
        assert!(eastbound.iter().all(|l| l.side == Side::Right));
        assert_eq!(node.get_all_lanes_connecting_from(east).len(), 2);

        let outer = eastbound[0].clone();
        assert!(node.owns_lane(&outer));
        let switches = node.switch_candidates(&outer);
        assert_eq!(switches.len(), 1);
        assert_eq!(switches[0].index, 1);
    }

    #[test]
    fn subsequent_lanes_match_index() {
        let mut ids = SlotMap::with_key();
        let mut node = road(&mut ids);
        let west = ids.insert(());
        node.add_connection(Connection::new(west, AxisPoint::new(p(0.0, 0.0))));
        node.create_lanes(2);

        let incoming = Lane {
            node: west,
            index: 1,
            side: Side::Right,
            points: vec![p(-10.0, 0.5), p(0.0, 0.5)],
            connects_from: None,
            connects_to: Some(node.id()),
        };
        let next = node.get_subsequent_lanes_connecting_from_lane(&incoming);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].index, 1);
        assert_eq!(next[0].side, Side::Right);

        let outgoing = Lane {
            node: west,
            index: 0,
            side: Side::Left,
            points: vec![],
            connects_from: Some(node.id()),
            connects_to: None,
        };
        let feeding = node.get_subsequent_lanes_connecting_to_lane(&outgoing);
        assert_eq!(feeding.len(), 1);
        assert_eq!(feeding[0].side, Side::Left);
        assert_eq!(feeding[0].index, 0);
    }

    #[test]
    fn intersections_never_offer_switches() {
        let mut ids = SlotMap::with_key();
        let id = ids.insert(());
        let ring = [p(0.0, 5.0), p(5.0, 0.0), p(0.0, -5.0), p(-5.0, 0.0), p(0.0, 5.0)];
        let shape = Shape::new(&ring, 4.0, None, None);
        let mut node = RoadNode::new(id, NodeKind::Intersection, shape, None);
        let a = ids.insert(());
        let b = ids.insert(());
        node.add_connection(Connection::new(a, AxisPoint::new(p(-5.0, 0.0))));
        node.add_connection(Connection::new(b, AxisPoint::new(p(5.0, 0.0))));
        node.create_lanes(2);
        assert_eq!(node.lanes().len(), 4);
        let lane = node.lanes()[0].clone();
        assert!(node.switch_candidates(&lane).is_empty());
    }
}
