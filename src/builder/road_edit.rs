use super::intersection::build_intersection;
use crate::error::{BuildError, Result, ShapeError};
use crate::geometry::{AxisPoint, Shape};
use crate::graph::{NodeId, NodeKind, RoadGraph, RoadNode};
use crate::math::{planar_eq, Point3};

/// Where the end of a freshly drawn road came down.
enum Landing {
    /// On an end of another road that nothing connects to yet.
    FreeEnd(NodeId),
    /// On an end of another road that already has a connection there.
    OccupiedEnd(NodeId),
    /// Somewhere along another road, away from its ends.
    Interior,
}

/// Fetches a node that free-hand edits may change.
pub(super) fn free_road(graph: &RoadGraph, id: NodeId) -> Result<&RoadNode> {
    let node = graph.node(id)?;
    if node.kind() != NodeKind::Road || node.placement().is_some() {
        return Err(
            BuildError::InvalidInput("only free-drawn roads can be edited".to_owned()).into(),
        );
    }
    Ok(node)
}

pub(super) fn lies_on(shape: &Shape, point: &Point3) -> bool {
    shape.length_at(point).is_some()
}

fn off_shape(point: &Point3) -> ShapeError {
    ShapeError::PointNotOnShape {
        x: point.x,
        z: point.z,
    }
}

/// Drops the links of `id` whose point is no longer on its centerline.
pub(super) fn drop_stale_connections(graph: &mut RoadGraph, id: NodeId) -> Result<()> {
    let node = graph.node(id)?;
    let stale: Vec<NodeId> = node
        .connections()
        .iter()
        .filter(|c| !lies_on(node.shape(), &c.point.point()))
        .map(|c| c.connected)
        .collect();
    for other in stale {
        graph.disconnect(id, other)?;
    }
    Ok(())
}

/// Moves the links of `from` that lie on the shape of `to` over to `to`,
/// except those at `except`.
pub(super) fn hand_over(
    graph: &mut RoadGraph,
    from: NodeId,
    to: NodeId,
    except: Option<&Point3>,
) -> Result<()> {
    let piece = graph.node(to)?.shape().clone();
    graph.transfer_connections(from, to, |c| {
        let p = c.point.point();
        lies_on(&piece, &p) && !except.is_some_and(|e| planar_eq(e, &p))
    })?;
    Ok(())
}

/// Splits a road in two at the centerline point nearest `point`.
///
/// The far half becomes a new node, takes over the links lying on it and is
/// linked to the near half at the split point. Returns `None` when the point
/// snaps to an open end, or when a circular road was only re-anchored.
pub(super) fn split_road(
    graph: &mut RoadGraph,
    id: NodeId,
    point: &Point3,
) -> Result<Option<NodeId>> {
    let mut shape = free_road(graph, id)?.shape().clone();
    let at = shape
        .get_shape_axis_point(point)
        .ok_or_else(|| off_shape(point))?;
    let far = shape.split(&at)?;
    graph.set_shape(id, shape)?;
    let Some(far) = far else {
        return Ok(None);
    };

    let far_id = graph.add_node(NodeKind::Road, far);
    hand_over(graph, id, far_id, Some(&at.point()))?;
    graph.connect(id, far_id, at)?;
    Ok(Some(far_id))
}

/// Joins road `b` onto road `a` at a shared endpoint; `b` is removed.
///
/// If the joined centerline runs back into itself, the knot is cut off into
/// its own node, linked to `a` at the knot point.
pub(super) fn merge_roads(graph: &mut RoadGraph, a: NodeId, b: NodeId) -> Result<NodeId> {
    if a == b {
        return Err(BuildError::InvalidInput("cannot merge a road with itself".to_owned()).into());
    }
    let mut shape = free_road(graph, a)?.shape().clone();
    shape.merge_with(free_road(graph, b)?.shape())?;
    let knot = untie(&mut shape)?;

    graph.transfer_connections(b, a, |_| true)?;
    graph.remove_node(b)?;
    graph.set_shape(a, shape)?;
    if let Some((at, piece)) = knot {
        let piece_id = graph.add_node(NodeKind::Road, piece);
        hand_over(graph, a, piece_id, Some(&at.point()))?;
        graph.connect(a, piece_id, at)?;
    }
    drop_stale_connections(graph, a)?;
    Ok(a)
}

/// Cuts a knot off `shape`, looking at both ends. Returns the knot point and
/// the piece cut off.
fn untie(shape: &mut Shape) -> Result<Option<(AxisPoint, Shape)>> {
    if shape.find_knot().is_none() {
        let reversed = shape.reversed();
        if reversed.find_knot().is_none() {
            return Ok(None);
        }
        *shape = reversed;
    }
    let at = shape.find_knot().ok_or(ShapeError::KnotNotFound)?;
    let piece = shape.cut_knot()?;
    Ok(Some((at, piece)))
}

/// Removes `radius` of centerline around the point of a road nearest
/// `point`. Returns the nodes left over: none, the road itself, or the road
/// and a new node for the far remainder.
pub(super) fn cut_road(
    graph: &mut RoadGraph,
    id: NodeId,
    point: &Point3,
    radius: f64,
) -> Result<Vec<NodeId>> {
    if radius <= 0.0 {
        return Err(BuildError::InvalidInput("cut radius must be positive".to_owned()).into());
    }
    let mut shape = free_road(graph, id)?.shape().clone();
    let at = shape
        .get_shape_axis_point(point)
        .ok_or_else(|| off_shape(point))?;
    let cut = shape.get_shape_cut(&at, radius)?;
    let remainder = shape.cut(&cut)?;

    if shape.is_empty() {
        graph.remove_node(id)?;
        return Ok(Vec::new());
    }
    graph.set_shape(id, shape)?;
    let mut survivors = vec![id];
    if let Some(piece) = remainder {
        let piece_id = graph.add_node(NodeKind::Road, piece);
        hand_over(graph, id, piece_id, None)?;
        survivors.push(piece_id);
    }
    drop_stale_connections(graph, id)?;
    Ok(survivors)
}

/// Adds a road along `axis` and splices each of its ends into the network:
/// a free road end is merged with, an occupied one is linked to, and the
/// interior of a road gets an intersection.
pub(super) fn draw_road(graph: &mut RoadGraph, axis: &[Point3]) -> Result<NodeId> {
    let shape = Shape::new(axis, graph.config().road_width(), None, None);
    if shape.joints().len() < 2 {
        return Err(
            BuildError::InvalidInput("a road needs at least two distinct points".to_owned())
                .into(),
        );
    }
    let axis = shape.axis_points();
    let ends: Vec<Point3> = [axis.first(), axis.last()]
        .into_iter()
        .flatten()
        .copied()
        .collect();

    let mut current = graph.add_node(NodeKind::Road, shape);
    for p in ends {
        let node = graph.node(current)?;
        let already_linked = node
            .connections()
            .iter()
            .any(|c| planar_eq(&c.point.point(), &p));
        if node.shape().end_at(&p).is_none() || already_linked {
            continue;
        }
        match find_landing(graph, current, &p) {
            Some(Landing::FreeEnd(other)) => current = merge_roads(graph, other, current)?,
            Some(Landing::OccupiedEnd(other)) => {
                graph.connect(current, other, AxisPoint::new(p))?;
            }
            Some(Landing::Interior) => {
                build_intersection(graph, &p)?;
            }
            None => {}
        }
    }
    Ok(current)
}

fn find_landing(graph: &RoadGraph, current: NodeId, p: &Point3) -> Option<Landing> {
    let roads: Vec<&RoadNode> = graph
        .iter()
        .filter(|n| n.id() != current && n.kind() == NodeKind::Road && n.placement().is_none())
        .collect();

    let on_end = roads.iter().find(|n| n.shape().end_at(p).is_some());
    if let Some(node) = on_end {
        let occupied = node
            .connections()
            .iter()
            .any(|c| planar_eq(&c.point.point(), p));
        return Some(if occupied {
            Landing::OccupiedEnd(node.id())
        } else {
            Landing::FreeEnd(node.id())
        });
    }
    roads
        .iter()
        .any(|n| lies_on(n.shape(), p))
        .then_some(Landing::Interior)
}
