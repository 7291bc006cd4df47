use super::{Route, TravelSegment};
use crate::error::{Result, RouteError};
use crate::graph::{Lane, RoadGraph, RoadNode};

/// Resolves one concrete lane per node along a route, starting on
/// `start_lane` and finishing on `end_lane`.
///
/// The path is walked forward, each step taking a lane of the next node that
/// continues the current one and (before the last node) heads on towards the
/// node after. The last node may switch onto `end_lane`. When a step fails,
/// lane switches are tried on earlier nodes, from the failure point back to
/// the start, re-walking forward after each one.
///
/// Each retry adds a single switch. That is always enough: lanes only lead
/// into lanes of the same index, so a path keeps one index from its last
/// switch onwards and a second switch earlier on could never be needed.
pub struct FindLaneOnRoute<'a> {
    route: &'a Route,
    start_lane: &'a Lane,
    end_lane: &'a Lane,
}

impl<'a> FindLaneOnRoute<'a> {
    #[must_use]
    pub fn new(route: &'a Route, start_lane: &'a Lane, end_lane: &'a Lane) -> Self {
        Self {
            route,
            start_lane,
            end_lane,
        }
    }

    /// Executes the resolution.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::EmptyRoute` for an empty route,
    /// `RouteError::LaneNotOnNode` if a lane is not one of the first or last
    /// node's lanes, and `RouteError::NoLanePath` if no combination of lanes
    /// and switches connects them.
    pub fn execute(&self, graph: &RoadGraph) -> Result<Vec<TravelSegment>> {
        let ids = self.route.nodes();
        let (Some(&first), Some(&last)) = (ids.first(), ids.last()) else {
            return Err(RouteError::EmptyRoute.into());
        };
        if !graph.node(first)?.owns_lane(self.start_lane) {
            return Err(RouteError::LaneNotOnNode("first").into());
        }
        if !graph.node(last)?.owns_lane(self.end_lane) {
            return Err(RouteError::LaneNotOnNode("last").into());
        }

        let mut start = TravelSegment::new(first, self.start_lane.clone());
        if ids.len() == 1 {
            if self.start_lane != self.end_lane {
                start.switch_lane = Some(self.end_lane.clone());
            }
            return Ok(vec![start]);
        }

        let nodes = ids
            .iter()
            .map(|&id| graph.node(id))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut segments = vec![start];
        let Err(failure) = self.walk(&nodes, &mut segments) else {
            return Ok(segments);
        };

        for j in (0..=failure).rev() {
            for candidate in nodes[j].switch_candidates(&segments[j].lane) {
                let mut trial = segments[..=j].to_vec();
                trial[j].switch_lane = Some(candidate.clone());
                if self.walk(&nodes, &mut trial).is_ok() {
                    return Ok(trial);
                }
            }
        }
        Err(RouteError::NoLanePath { segment: failure }.into())
    }

    /// Extends `segments` up to the last node. On failure returns the index
    /// of the segment whose lane could not be continued.
    fn walk(
        &self,
        nodes: &[&RoadNode],
        segments: &mut Vec<TravelSegment>,
    ) -> std::result::Result<(), usize> {
        let last = nodes.len() - 1;
        while segments.len() <= last {
            let i = segments.len() - 1;
            let next = self.step(nodes, i, &segments[i]).ok_or(i)?;
            segments.push(next);
        }
        Ok(())
    }

    /// Picks the segment following `current`, the segment on `nodes[i]`.
    fn step(
        &self,
        nodes: &[&RoadNode],
        i: usize,
        current: &TravelSegment,
    ) -> Option<TravelSegment> {
        let node = nodes.get(i + 1)?;
        let lane = current.effective_lane();
        let entries = node.get_subsequent_lanes_connecting_from_lane(lane);

        if i + 2 == nodes.len() {
            if lane.leads_into(self.end_lane) {
                return Some(TravelSegment::new(node.id(), self.end_lane.clone()));
            }
            return entries
                .into_iter()
                .find(|entry| node.switch_candidates(entry).contains(&self.end_lane))
                .map(|entry| TravelSegment {
                    node: node.id(),
                    lane: entry.clone(),
                    switch_lane: Some(self.end_lane.clone()),
                });
        }

        let after = nodes.get(i + 2)?.id();
        entries
            .into_iter()
            .find(|entry| entry.connects_to == Some(after))
            .map(|entry| TravelSegment::new(node.id(), entry.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::error::TarmacError;
    use crate::geometry::{AxisPoint, Shape};
    use crate::graph::{NodeId, NodeKind, Side};
    use crate::math::Point3;
    use crate::routing::travel_points;
    use approx::assert_relative_eq;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    /// Three eastbound pieces in a row: 0..10, 10..20, 20..30.
    fn row(kinds: [NodeKind; 3]) -> (RoadGraph, [NodeId; 3]) {
        let mut graph = RoadGraph::new(NetworkConfig::new(4.0, 2, 10.0).unwrap());
        let ids = [0.0, 10.0, 20.0].map(|x| {
            let shape = Shape::new(&[p(x, 0.0), p(x + 10.0, 0.0)], 4.0, None, None);
            graph.add_node(NodeKind::Road, shape)
        });
        let ids = [0, 1, 2].map(|k| {
            if kinds[k] == NodeKind::Road {
                return ids[k];
            }
            let shape = graph.node(ids[k]).unwrap().shape().clone();
            graph.remove_node(ids[k]).unwrap();
            graph.add_node(kinds[k], shape)
        });
        graph.connect(ids[0], ids[1], AxisPoint::new(p(10.0, 0.0))).unwrap();
        graph.connect(ids[1], ids[2], AxisPoint::new(p(20.0, 0.0))).unwrap();
        (graph, ids)
    }

    fn lane(graph: &RoadGraph, node: NodeId, side: Side, index: usize) -> Lane {
        graph
            .node(node)
            .unwrap()
            .lanes()
            .iter()
            .find(|l| l.side == side && l.index == index)
            .unwrap()
            .clone()
    }

    fn assert_continuous(segments: &[TravelSegment]) {
        for pair in segments.windows(2) {
            assert!(pair[0].effective_lane().leads_into(&pair[1].lane));
        }
    }

    #[test]
    fn single_node_switches_in_place() {
        let (graph, ids) = row([NodeKind::Road; 3]);
        let route = Route::from(vec![ids[0]]);
        let start = lane(&graph, ids[0], Side::Right, 0);
        let end = lane(&graph, ids[0], Side::Right, 1);
        let path = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].switch_lane.as_ref(), Some(&end));

        let path = FindLaneOnRoute::new(&route, &start, &start).execute(&graph).unwrap();
        assert!(path[0].switch_lane.is_none());
    }

    #[test]
    fn straight_through_without_switch() {
        let (graph, ids) = row([NodeKind::Road; 3]);
        let route = Route::from(ids.to_vec());
        let start = lane(&graph, ids[0], Side::Right, 1);
        let end = lane(&graph, ids[2], Side::Right, 1);
        let path = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap();
        assert_eq!(path.len(), 3);
        assert!(path.iter().all(|s| s.switch_lane.is_none() && s.lane.index == 1));
        assert_continuous(&path);
    }

    #[test]
    fn last_node_switches_onto_end_lane() {
        let (graph, ids) = row([NodeKind::Road; 3]);
        let route = Route::from(ids.to_vec());
        let start = lane(&graph, ids[0], Side::Right, 0);
        let end = lane(&graph, ids[2], Side::Right, 1);
        let path = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap();
        assert_continuous(&path);
        assert_eq!(path[2].lane.index, 0);
        assert_eq!(path[2].switch_lane.as_ref(), Some(&end));

        let points = travel_points(&path);
        assert_eq!(points.len(), 5);
        assert_relative_eq!(points[0], p(0.0, 1.5), epsilon = 1e-9);
        assert_relative_eq!(points[2], p(20.0, 1.5), epsilon = 1e-9);
        assert_relative_eq!(points[3], p(20.0, 0.5), epsilon = 1e-9);
        assert_relative_eq!(points[4], p(30.0, 0.5), epsilon = 1e-9);
    }

    #[test]
    fn backtracks_to_an_earlier_switch() {
        let (graph, ids) = row([NodeKind::Road, NodeKind::Road, NodeKind::Spawner]);
        let route = Route::from(ids.to_vec());
        let start = lane(&graph, ids[0], Side::Right, 0);
        let end = lane(&graph, ids[2], Side::Right, 1);
        let path = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap();
        assert_continuous(&path);
        assert_eq!(path[1].lane.index, 0);
        assert_eq!(path[1].effective_lane().index, 1);
        assert_eq!(path[2].lane, end);
        assert!(path[2].switch_lane.is_none());
    }

    #[test]
    fn two_nodes_switch_on_the_first() {
        let (graph, ids) = row([NodeKind::Road, NodeKind::Spawner, NodeKind::Road]);
        let route = Route::from(vec![ids[0], ids[1]]);
        let start = lane(&graph, ids[0], Side::Right, 0);
        let end = lane(&graph, ids[1], Side::Right, 1);
        let path = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].effective_lane().index, 1);
        assert_continuous(&path);
    }

    #[test]
    fn infeasible_lanes_fail() {
        let (graph, ids) = row([NodeKind::Spawner; 3]);
        let route = Route::from(ids.to_vec());
        let start = lane(&graph, ids[0], Side::Right, 0);
        let end = lane(&graph, ids[2], Side::Right, 1);
        let err = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap_err();
        assert!(matches!(err, TarmacError::Route(RouteError::NoLanePath { .. })));

        let (graph, ids) = row([NodeKind::Road; 3]);
        let start = lane(&graph, ids[0], Side::Right, 0);
        let wrong_way = lane(&graph, ids[2], Side::Left, 0);
        assert!(FindLaneOnRoute::new(&route, &start, &wrong_way).execute(&graph).is_err());
    }

    #[test]
    fn lanes_must_belong_to_route_ends() {
        let (graph, ids) = row([NodeKind::Road; 3]);
        let route = Route::from(ids.to_vec());
        let start = lane(&graph, ids[1], Side::Right, 0);
        let end = lane(&graph, ids[2], Side::Right, 0);
        let err = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap_err();
        assert!(matches!(err, TarmacError::Route(RouteError::LaneNotOnNode("first"))));

        let empty = Route::from(Vec::new());
        let err = FindLaneOnRoute::new(&empty, &start, &end).execute(&graph).unwrap_err();
        assert!(matches!(err, TarmacError::Route(RouteError::EmptyRoute)));
    }

    #[test]
    fn outer_lanes_continue_through_a_split_corner() {
        let mut graph = RoadGraph::new(NetworkConfig::new(4.0, 2, 10.0).unwrap());
        let mut near = Shape::new(&[p(0.0, 0.0), p(20.0, 0.0), p(20.0, 20.0)], 4.0, None, None);
        let far = near.split(&AxisPoint::new(p(20.0, 0.0))).unwrap().unwrap();
        let road = graph.add_node(NodeKind::Road, near);
        let spawner = graph.add_node(NodeKind::Spawner, far);
        graph.connect(road, spawner, AxisPoint::new(p(20.0, 0.0))).unwrap();

        let route = Route::from(vec![road, spawner]);
        for index in 0..2 {
            let start = lane(&graph, road, Side::Right, index);
            let end = lane(&graph, spawner, Side::Right, index);
            let path = FindLaneOnRoute::new(&route, &start, &end).execute(&graph).unwrap();
            assert_eq!(path.len(), 2);
            assert!(path[0].switch_lane.is_none());
            assert_continuous(&path);
        }
    }
}
