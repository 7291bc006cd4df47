//! User-driven network edits.

mod intersection;
mod observer;
mod road_edit;
mod tiles;

pub use observer::{NetworkObserver, TracingObserver};

use crate::config::NetworkConfig;
use crate::error::Result;
use crate::graph::{NodeId, NodeKind, RoadGraph};
use crate::math::Point3;

/// Applies interactive edits to a road network.
///
/// Each edit runs against a copy of the graph that replaces the live graph
/// only once the whole edit has succeeded, so a failed edit leaves the
/// network as it was. The observer hears about committed changes only.
pub struct NetworkBuilder {
    graph: RoadGraph,
    observer: Box<dyn NetworkObserver>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

impl NetworkBuilder {
    /// Creates a builder over an empty network, reporting through [`TracingObserver`].
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            graph: RoadGraph::new(config),
            observer: Box::new(TracingObserver),
        }
    }

    /// Replaces the observer notified of committed edits.
    #[must_use]
    pub fn with_observer(mut self, observer: impl NetworkObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    #[must_use]
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        self.graph.config()
    }

    #[must_use]
    pub fn into_graph(self) -> RoadGraph {
        self.graph
    }

    fn edit<T, F>(&mut self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut RoadGraph) -> Result<T>,
    {
        let mut next = self.graph.clone();
        let out = apply(&mut next)?;
        self.commit(next);
        Ok(out)
    }

    fn commit(&mut self, next: RoadGraph) {
        for node in self.graph.iter() {
            if !next.contains(node.id()) {
                self.observer.node_removed(node.id());
            }
        }
        for node in next.iter() {
            let before = match self.graph.node(node.id()) {
                Ok(old) => old.connections().len(),
                Err(_) => {
                    self.observer.node_added(node.id(), node.kind());
                    0
                }
            };
            let after = node.connections().len();
            if before != after {
                self.observer.connections_changed(node.id(), after);
            }
        }
        self.graph = next;
    }

    /// Draws a road along `axis` and splices its ends into the network.
    ///
    /// An end placed on a free end of another road merges the two roads; on an
    /// end that is already linked it links the roads end to end; on the
    /// interior of a road it builds an intersection there. Returns the node
    /// the drawn road ended up in.
    ///
    /// # Errors
    ///
    /// Returns an error if `axis` has fewer than two distinct points or if
    /// splicing fails, e.g. when an end is too close to an intersection.
    pub fn draw_road(&mut self, axis: &[Point3]) -> Result<NodeId> {
        self.edit(|graph| road_edit::draw_road(graph, axis))
    }

    /// Splits a free-drawn road at the centerline point nearest `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a free-drawn road or `point` is
    /// off its footprint.
    pub fn split_road(&mut self, node: NodeId, point: &Point3) -> Result<Option<NodeId>> {
        self.edit(|graph| road_edit::split_road(graph, node, point))
    }

    /// Merges road `b` into road `a` at a shared endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not a free-drawn road or the
    /// roads share no endpoint.
    pub fn merge_roads(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.edit(|graph| road_edit::merge_roads(graph, a, b))
    }

    /// Removes `radius` of road around `point`. Returns the surviving nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a free-drawn road, `point` is off
    /// its footprint or `radius` is not positive.
    pub fn cut_road(&mut self, node: NodeId, point: &Point3, radius: f64) -> Result<Vec<NodeId>> {
        self.edit(|graph| road_edit::cut_road(graph, node, point, radius))
    }

    /// Builds an intersection where at least three road ends meet at `point`,
    /// splitting roads that run through it.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three ends meet there or a road is too
    /// short to make room for the intersection.
    pub fn build_intersection(&mut self, point: &Point3) -> Result<NodeId> {
        self.edit(|graph| intersection::build_intersection(graph, point))
    }

    /// Places a tile on the grid and links it with facing neighbours.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is already occupied.
    pub fn place_tile(&mut self, kind: NodeKind, cell: [i32; 3], rotation: u8) -> Result<NodeId> {
        self.edit(|graph| tiles::place_tile(graph, kind, cell, rotation))
    }

    /// Removes a node and all its links.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the node does not exist.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.edit(|graph| {
            graph.remove_node(node)?;
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{BuildError, ShapeError, TarmacError};
    use crate::graph::Side;
    use crate::routing::{CreateRoadRoutes, FindLaneOnRoute};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Added(NodeId, NodeKind),
        Removed(NodeId),
        Connections(NodeId, usize),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl NetworkObserver for Recorder {
        fn node_added(&mut self, id: NodeId, kind: NodeKind) {
            self.0.borrow_mut().push(Event::Added(id, kind));
        }

        fn node_removed(&mut self, id: NodeId) {
            self.0.borrow_mut().push(Event::Removed(id));
        }

        fn connections_changed(&mut self, id: NodeId, count: usize) {
            self.0.borrow_mut().push(Event::Connections(id, count));
        }
    }

    fn assert_axis(builder: &NetworkBuilder, id: NodeId, expected: &[Point3]) {
        let axis = builder.graph().node(id).unwrap().shape().axis_points();
        assert_eq!(axis.len(), expected.len(), "axis {axis:?}");
        for (got, want) in axis.iter().zip(expected) {
            assert_relative_eq!(*got, *want, epsilon = 1e-9);
        }
    }

    #[test]
    fn tiles_link_with_facing_neighbours() {
        init_tracing();
        let mut builder = NetworkBuilder::default();
        // Spawner rotated to face east, then two east-west roads.
        let spawner = builder.place_tile(NodeKind::Spawner, [-1, 0, 0], 1).unwrap();
        let first = builder.place_tile(NodeKind::Road, [0, 0, 0], 0).unwrap();
        let second = builder.place_tile(NodeKind::Road, [1, 0, 0], 0).unwrap();
        let graph = builder.graph();

        assert_eq!(graph.neighbours(spawner).unwrap(), vec![first]);
        assert_eq!(graph.neighbours(first).unwrap(), vec![spawner, second]);

        let routes = CreateRoadRoutes::new(spawner, second).execute(graph).unwrap();
        assert_eq!(routes.len(), 1);
        let start = graph.node(spawner).unwrap().get_all_lanes_connecting_to(first)[0].clone();
        let end = graph.node(second).unwrap().get_all_lanes_connecting_from(first)[0].clone();
        let path = FindLaneOnRoute::new(&routes[0], &start, &end).execute(graph).unwrap();
        assert_eq!(path.len(), 3);
        assert!(path.iter().all(|s| s.switch_lane.is_none()));
    }

    #[test]
    fn occupied_cell_is_rejected() {
        let mut builder = NetworkBuilder::default();
        builder.place_tile(NodeKind::Curve, [0, 0, 0], 0).unwrap();
        let err = builder.place_tile(NodeKind::Road, [0, 0, 0], 0).unwrap_err();
        assert!(matches!(err, TarmacError::Build(BuildError::InvalidInput(_))));
        assert_eq!(builder.graph().len(), 1);
    }

    #[test]
    fn curve_tile_bends_through_the_centre() {
        let mut builder = NetworkBuilder::default();
        let curve = builder.place_tile(NodeKind::Curve, [0, 0, 0], 0).unwrap();
        assert_axis(&builder, curve, &[p(0.0, 5.0), p(0.0, 0.0), p(5.0, 0.0)]);
        let junction = builder.place_tile(NodeKind::Intersection, [1, 0, 0], 0).unwrap();
        assert!(builder.graph().node(curve).unwrap().is_connected_to(junction));
        assert_eq!(builder.graph().node(junction).unwrap().lanes().len(), 0);
    }

    #[test]
    fn drawing_onto_a_free_end_merges() {
        let mut builder = NetworkBuilder::default();
        let a = builder.draw_road(&[p(0.0, 0.0), p(20.0, 0.0)]).unwrap();
        let merged = builder.draw_road(&[p(20.0, 0.0), p(40.0, 0.0)]).unwrap();
        assert_eq!(merged, a);
        assert_eq!(builder.graph().len(), 1);
        assert_axis(&builder, a, &[p(0.0, 0.0), p(40.0, 0.0)]);
    }

    #[test]
    fn drawing_onto_an_interior_builds_an_intersection() {
        let mut builder = NetworkBuilder::default();
        let a = builder.draw_road(&[p(0.0, 0.0), p(40.0, 0.0)]).unwrap();
        let b = builder.draw_road(&[p(20.0, 0.0), p(20.0, 30.0)]).unwrap();
        let graph = builder.graph();
        assert_eq!(graph.len(), 4);

        let junction = graph
            .iter()
            .find(|n| n.kind() == NodeKind::Intersection)
            .unwrap();
        assert_eq!(junction.connections().len(), 3);
        assert_eq!(junction.lanes().len(), 6);
        assert!(junction.shape().is_circular());

        // Every arm is pulled back by the intersection radius.
        assert_axis(&builder, a, &[p(0.0, 0.0), p(14.0, 0.0)]);
        assert_relative_eq!(graph.node(b).unwrap().shape().axis_points()[0], p(20.0, 6.0), epsilon = 1e-9);
        let far = graph
            .iter()
            .find(|n| n.kind() == NodeKind::Road && n.id() != a && n.id() != b)
            .unwrap();
        assert_relative_eq!(far.shape().axis_points()[0], p(26.0, 0.0), epsilon = 1e-9);

        let routes = CreateRoadRoutes::new(a, far.id()).execute(graph).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].nodes(), &[a, junction.id(), far.id()]);
        let start = graph
            .node(a)
            .unwrap()
            .lanes()
            .iter()
            .find(|l| l.side == Side::Right)
            .unwrap()
            .clone();
        let end = far
            .lanes()
            .iter()
            .find(|l| l.side == Side::Right)
            .unwrap()
            .clone();
        let path = FindLaneOnRoute::new(&routes[0], &start, &end).execute(graph).unwrap();
        for pair in path.windows(2) {
            assert!(pair[0].effective_lane().leads_into(&pair[1].lane));
        }
    }

    #[test]
    fn failed_edit_leaves_the_network_untouched() {
        let mut builder = NetworkBuilder::default();
        let a = builder.draw_road(&[p(0.0, 0.0), p(40.0, 0.0)]).unwrap();
        // Too short to be pulled back by the intersection radius.
        let err = builder.draw_road(&[p(20.0, 0.0), p(20.0, 4.0)]).unwrap_err();
        assert!(matches!(err, TarmacError::Shape(ShapeError::ShortenOverrun { .. })));
        assert_eq!(builder.graph().len(), 1);
        assert_axis(&builder, a, &[p(0.0, 0.0), p(40.0, 0.0)]);
    }

    #[test]
    fn split_then_merge_restores_the_road() {
        let mut builder = NetworkBuilder::default();
        let a = builder.draw_road(&[p(0.0, 0.0), p(40.0, 0.0)]).unwrap();
        let b = builder.split_road(a, &p(20.0, 0.5)).unwrap().unwrap();
        assert!(builder.graph().node(a).unwrap().is_connected_to(b));
        assert_axis(&builder, a, &[p(0.0, 0.0), p(20.0, 0.0)]);
        assert_axis(&builder, b, &[p(20.0, 0.0), p(40.0, 0.0)]);

        builder.merge_roads(a, b).unwrap();
        assert_eq!(builder.graph().len(), 1);
        assert!(builder.graph().node(a).unwrap().connections().is_empty());
        assert_axis(&builder, a, &[p(0.0, 0.0), p(40.0, 0.0)]);
    }

    #[test]
    fn cut_leaves_two_unlinked_pieces() {
        let mut builder = NetworkBuilder::default();
        let a = builder.draw_road(&[p(0.0, 0.0), p(40.0, 0.0)]).unwrap();
        let survivors = builder.cut_road(a, &p(20.0, 0.0), 10.0).unwrap();
        assert_eq!(survivors.len(), 2);
        assert_axis(&builder, a, &[p(0.0, 0.0), p(15.0, 0.0)]);
        assert_axis(&builder, survivors[1], &[p(25.0, 0.0), p(40.0, 0.0)]);
        assert!(builder.graph().node(a).unwrap().connections().is_empty());
    }

    #[test]
    fn cut_keeps_links_on_the_matching_piece() {
        let mut builder = NetworkBuilder::default();
        let a = builder.draw_road(&[p(0.0, 0.0), p(40.0, 0.0)]).unwrap();
        let b = builder.split_road(a, &p(20.0, 0.0)).unwrap().unwrap();
        // `a` now ends at 20 where it links to `b`.
        let survivors = builder.cut_road(a, &p(8.0, 0.0), 4.0).unwrap();
        let far = survivors[1];
        assert!(builder.graph().node(far).unwrap().is_connected_to(b));
        assert!(!builder.graph().node(a).unwrap().is_connected_to(b));
    }

    #[test]
    fn merging_into_a_knot_splits_off_the_loop() {
        let mut builder = NetworkBuilder::default();
        let a = builder
            .draw_road(&[p(0.0, 0.0), p(100.0, 0.0), p(100.0, 10.0), p(90.0, 10.0)])
            .unwrap();
        let merged = builder.draw_road(&[p(90.0, 10.0), p(90.0, 0.0)]).unwrap();
        assert_eq!(merged, a);

        let graph = builder.graph();
        assert_eq!(graph.len(), 2);
        assert_axis(&builder, a, &[p(0.0, 0.0), p(90.0, 0.0)]);
        let neighbours = graph.neighbours(a).unwrap();
        assert_eq!(neighbours.len(), 1);
        let knot = graph.node(neighbours[0]).unwrap();
        assert!(knot.shape().is_circular());
        assert_relative_eq!(knot.connection_to(a).unwrap().point.point(), p(90.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn observer_hears_committed_edits_only() {
        init_tracing();
        let recorder = Recorder::default();
        let events = Rc::clone(&recorder.0);
        let mut builder = NetworkBuilder::default().with_observer(recorder);

        let a = builder.place_tile(NodeKind::Road, [0, 0, 0], 0).unwrap();
        assert_eq!(*events.borrow(), vec![Event::Added(a, NodeKind::Road)]);
        events.borrow_mut().clear();

        let b = builder.place_tile(NodeKind::Road, [1, 0, 0], 0).unwrap();
        let seen = events.borrow().clone();
        assert!(seen.contains(&Event::Added(b, NodeKind::Road)));
        assert!(seen.contains(&Event::Connections(a, 1)));
        assert!(seen.contains(&Event::Connections(b, 1)));
        events.borrow_mut().clear();

        assert!(builder.place_tile(NodeKind::Road, [1, 0, 0], 0).is_err());
        assert!(events.borrow().is_empty());

        builder.remove_node(b).unwrap();
        let seen = events.borrow().clone();
        assert!(seen.contains(&Event::Removed(b)));
        assert!(seen.contains(&Event::Connections(a, 0)));
    }
}
