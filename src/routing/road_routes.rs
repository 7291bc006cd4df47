use super::Route;
use crate::error::Result;
use crate::graph::{NodeId, RoadGraph};

/// Collects every simple route between two nodes.
///
/// Depth-first over an explicit stack of frames, one per node on the current
/// chain. Each frame keeps the neighbours it has yet to try. Reaching `end`
/// records the chain and keeps searching, so each simple route appears
/// exactly once, in discovery order.
pub struct CreateRoadRoutes {
    start: NodeId,
    end: NodeId,
}

struct Frame {
    node: NodeId,
    to_visit: Vec<NodeId>,
}

impl Frame {
    fn open(graph: &RoadGraph, node: NodeId) -> Result<Self> {
        let mut to_visit = graph.neighbours(node)?;
        // Popped from the back, so tried in connection order.
        to_visit.reverse();
        Ok(Self { node, to_visit })
    }
}

impl CreateRoadRoutes {
    #[must_use]
    pub fn new(start: NodeId, end: NodeId) -> Self {
        Self { start, end }
    }

    /// Executes the search.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if `start` or `end` is not in the graph.
    pub fn execute(&self, graph: &RoadGraph) -> Result<Vec<Route>> {
        graph.node(self.end)?;
        let root = Frame::open(graph, self.start)?;
        if self.start == self.end {
            return Ok(vec![Route::from(vec![self.start])]);
        }

        let mut routes = Vec::new();
        let mut stack = vec![root];
        while let Some(frame) = stack.last_mut() {
            let Some(next) = frame.to_visit.pop() else {
                stack.pop();
                continue;
            };
            if next == self.end {
                let mut chain: Vec<NodeId> = stack.iter().map(|f| f.node).collect();
                chain.push(next);
                routes.push(Route::from(chain));
                continue;
            }
            if !graph.contains(next) || stack.iter().any(|f| f.node == next) {
                continue;
            }
            stack.push(Frame::open(graph, next)?);
        }
        Ok(routes)
    }
}
