use crate::graph::{NodeId, NodeKind};

/// Receives notifications about committed network edits.
///
/// All methods default to doing nothing.
pub trait NetworkObserver {
    fn node_added(&mut self, _id: NodeId, _kind: NodeKind) {}

    fn node_removed(&mut self, _id: NodeId) {}

    /// Called when a node's number of connections differs after an edit.
    fn connections_changed(&mut self, _id: NodeId, _count: usize) {}
}

/// Reports every notification as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl NetworkObserver for TracingObserver {
    fn node_added(&mut self, id: NodeId, kind: NodeKind) {
        tracing::debug!(node = ?id, ?kind, "node added");
    }

    fn node_removed(&mut self, id: NodeId) {
        tracing::debug!(node = ?id, "node removed");
    }

    fn connections_changed(&mut self, id: NodeId, count: usize) {
        tracing::debug!(node = ?id, connections = count, "connections changed");
    }
}
