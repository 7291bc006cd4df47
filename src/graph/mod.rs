pub mod connection;
pub mod grid;
pub mod lanes;
pub mod node;

pub use connection::Connection;
pub use grid::{Entry, GridPlacement};
pub use lanes::{Lane, Side};
pub use node::{NodeId, NodeKind, RoadNode};

use crate::config::NetworkConfig;
use crate::error::GraphError;
use crate::geometry::{AxisPoint, Shape};
use slotmap::SlotMap;

/// Arena owning every road node of a network.
///
/// Nodes refer to each other through [`NodeId`]s stored in their
/// connections. Every connection-changing call on the graph keeps both sides
/// of a link in sync and rebuilds the lanes of the nodes it touched.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: SlotMap<NodeId, RoadNode>,
    config: NetworkConfig,
}

impl RoadGraph {
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // --- Node operations ---

    /// Inserts a free-standing node and returns its ID.
    pub fn add_node(&mut self, kind: NodeKind, shape: Shape) -> NodeId {
        self.insert(kind, shape, None)
    }

    /// Inserts a node occupying a grid cell and returns its ID.
    pub fn add_placed_node(
        &mut self,
        kind: NodeKind,
        shape: Shape,
        placement: GridPlacement,
    ) -> NodeId {
        self.insert(kind, shape, Some(placement))
    }

    fn insert(&mut self, kind: NodeKind, shape: Shape, placement: Option<GridPlacement>) -> NodeId {
        let lanes_per_side = self.config.lanes_per_side();
        self.nodes.insert_with_key(|id| {
            let mut node = RoadNode::new(id, kind, shape, placement);
            node.create_lanes(lanes_per_side);
            node
        })
    }

    /// Returns a reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node was removed or never existed.
    pub fn node(&self, id: NodeId) -> Result<&RoadNode, GraphError> {
        self.nodes.get(id).ok_or(GraphError::NodeNotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut RoadNode, GraphError> {
        self.nodes.get_mut(id).ok_or(GraphError::NodeNotFound)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoadNode> {
        self.nodes.values()
    }

    /// Neighbour ids of a node, in connection order.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn neighbours(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.node(id)?.neighbours())
    }

    /// Unlinks a node from all its neighbours and removes it.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn remove_node(&mut self, id: NodeId) -> Result<RoadNode, GraphError> {
        self.disconnect_all(id)?;
        self.nodes.remove(id).ok_or(GraphError::NodeNotFound)
    }

    /// Replaces a node's shape and rebuilds its lanes and its neighbours'.
    pub(crate) fn set_shape(&mut self, id: NodeId, shape: Shape) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        node.set_shape(shape);
        let mut touched = node.neighbours();
        touched.push(id);
        self.refresh(&touched);
        Ok(())
    }

    // --- Connection operations ---

    /// Links two nodes at a point shared by both shapes.
    ///
    /// Returns `false` without changes if they are already linked.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is missing or `a == b`.
    pub fn connect(&mut self, a: NodeId, b: NodeId, point: AxisPoint) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfConnection);
        }
        self.node(b)?;
        if self.node(a)?.is_connected_to(b) {
            return Ok(false);
        }
        self.node_mut(a)?.add_connection(Connection::new(b, point));
        self.node_mut(b)?.add_connection(Connection::new(a, point));
        self.refresh(&[a, b]);
        Ok(true)
    }

    /// Removes the link between two nodes on both sides.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotConnected` if they are not linked.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError> {
        self.node_mut(a)?
            .dismiss_connection(b)
            .ok_or(GraphError::NotConnected)?;
        if let Ok(other) = self.node_mut(b) {
            other.dismiss_connection(a);
        }
        self.refresh(&[a, b]);
        Ok(())
    }

    /// Removes every link of a node. Returns the former neighbours.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn disconnect_all(&mut self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let taken = self.node_mut(id)?.take_connections(|_| true);
        let neighbours: Vec<NodeId> = taken.iter().map(|c| c.connected).collect();
        for &n in &neighbours {
            if let Ok(other) = self.node_mut(n) {
                other.dismiss_connection(id);
            }
        }
        self.refresh(&neighbours);
        self.refresh(&[id]);
        Ok(neighbours)
    }

    /// Moves the links of `from` selected by `predicate` over to `to`.
    ///
    /// Each affected neighbour's mirror is re-pointed at `to`, so `from` no
    /// longer references them. A link `to` already has is dropped instead of
    /// duplicated, and a link between `from` and `to` is never moved.
    /// Returns the neighbours now linked to `to`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if either node does not exist.
    pub fn transfer_connections<F>(
        &mut self,
        from: NodeId,
        to: NodeId,
        predicate: F,
    ) -> Result<Vec<NodeId>, GraphError>
    where
        F: Fn(&Connection) -> bool,
    {
        self.node(to)?;
        let taken = self
            .node_mut(from)?
            .take_connections(|c| c.connected != to && predicate(c));

        let mut moved = Vec::with_capacity(taken.len());
        let mut touched = vec![from, to];
        for connection in taken {
            let n = connection.connected;
            touched.push(n);
            let already_linked = self.node(to)?.is_connected_to(n);
            let Ok(neighbour) = self.node_mut(n) else {
                continue;
            };
            if already_linked {
                neighbour.dismiss_connection(from);
            } else {
                neighbour.retarget_connection(from, to);
                self.node_mut(to)?.add_connection(connection);
                moved.push(n);
            }
        }
        self.refresh(&touched);
        Ok(moved)
    }

    /// Links `to` with every neighbour of `from` at the same points, keeping
    /// the links of `from`. Returns how many links were added.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if either node does not exist.
    pub fn copy_connections(&mut self, from: NodeId, to: NodeId) -> Result<usize, GraphError> {
        self.node(to)?;
        let connections = self.node(from)?.connections().to_vec();
        let mut added = 0;
        for c in connections.into_iter().filter(|c| c.connected != to) {
            if self.connect(to, c.connected, c.point)? {
                added += 1;
            }
        }
        Ok(added)
    }

    // --- Grid connections ---

    /// Whether two grid-placed nodes sit in neighbouring cells with entries
    /// facing each other.
    #[must_use]
    pub fn are_connectable(&self, a: NodeId, b: NodeId) -> bool {
        self.facing_entries(a, b).is_ok_and(|e| e.is_some())
    }

    fn facing_entries(&self, a: NodeId, b: NodeId) -> Result<Option<Entry>, GraphError> {
        let lhs = self.node(a)?;
        let rhs = self.node(b)?;
        let (pa, pb) = match (lhs.placement(), rhs.placement()) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => return Err(GraphError::NotPlaced),
        };
        let (ea, eb) = grid::relative_entries(pa.cell, pb.cell)?;
        let facing = pa.entries(lhs.kind()).contains(&ea) && pb.entries(rhs.kind()).contains(&eb);
        Ok(facing.then_some(ea))
    }

    /// Links two grid-placed nodes at the midpoint of their shared cell border.
    ///
    /// Returns `false` without changes if they are already linked or their
    /// entries do not face each other.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotAdjacent` for cells that are not direct
    /// neighbours and `GraphError::NotPlaced` for nodes off the grid.
    pub fn connect_roads(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        let Some(entry) = self.facing_entries(a, b)? else {
            return Ok(false);
        };
        if self.node(a)?.is_connected_to(b) {
            return Ok(false);
        }
        let placement = self.node(a)?.placement().ok_or(GraphError::NotPlaced)?;
        let point = placement.border_point(entry, self.config.grid_unit(), self.config.elevation());
        self.connect(a, b, AxisPoint::new(point))
    }

    // --- Lanes ---

    /// Rebuilds a node's lanes from its shape and connections.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn refresh_lanes(&mut self, id: NodeId) -> Result<(), GraphError> {
        let lanes_per_side = self.config.lanes_per_side();
        self.node_mut(id)?.create_lanes(lanes_per_side);
        Ok(())
    }

    fn refresh(&mut self, ids: &[NodeId]) {
        let lanes_per_side = self.config.lanes_per_side();
        for &id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.create_lanes(lanes_per_side);
            }
        }
    }
}
