use super::road_edit::{drop_stale_connections, hand_over, lies_on};
use crate::error::{BuildError, Result, ShapeError};
use crate::geometry::{AxisPoint, Shape, ShapeEnd};
use crate::graph::{NodeId, NodeKind, RoadGraph};
use crate::math::Point3;

/// A road end that will feed the new intersection.
struct Arm {
    /// Existing node to reshape, or `None` for a piece split off `origin`.
    node: Option<NodeId>,
    origin: NodeId,
    shape: Shape,
    end: ShapeEnd,
}

/// Builds an intersection where three or more road ends meet at `point`.
///
/// Roads ending at `point` contribute one end, roads running through it are
/// split and contribute two. Every end is pulled back by the configured
/// intersection radius and the intersection is a loop through the pulled-back
/// ends, ordered by angle around `point`.
pub(super) fn build_intersection(graph: &mut RoadGraph, point: &Point3) -> Result<NodeId> {
    let radius = graph.config().intersection_radius();
    let width = graph.config().road_width();
    let at = AxisPoint::new(*point);

    let mut arms = Vec::new();
    // Links between the two halves of a loop road opened up by the intersection.
    let mut loop_links: Vec<(usize, usize, AxisPoint)> = Vec::new();

    for node in graph.iter() {
        if node.kind() != NodeKind::Road || node.placement().is_some() {
            continue;
        }
        let id = node.id();
        let shape = node.shape();
        if let Some(end) = shape.end_at(point) {
            let mut trimmed = shape.clone();
            trimmed.shorten(end, radius)?;
            arms.push(Arm {
                node: Some(id),
                origin: id,
                shape: trimmed,
                end,
            });
        } else if shape.is_circular() && lies_on(shape, point) {
            let mut near = shape.clone();
            near.split(&at)?;
            near.shorten(ShapeEnd::Tail, radius)?;
            near.shorten(ShapeEnd::Head, radius)?;
            let middle = near
                .point_at_length(near.length() * 0.5)
                .ok_or(ShapeError::Empty)?;
            let far = near.split(&middle)?.ok_or_else(|| {
                ShapeError::Degenerate("loop road too short for an intersection".to_owned())
            })?;
            loop_links.push((arms.len(), arms.len() + 1, middle));
            arms.push(Arm {
                node: Some(id),
                origin: id,
                shape: near,
                end: ShapeEnd::Tail,
            });
            arms.push(Arm {
                node: None,
                origin: id,
                shape: far,
                end: ShapeEnd::Head,
            });
        } else if lies_on(shape, point) {
            let mut near = shape.clone();
            let Some(mut far) = near.split(&at)? else {
                continue;
            };
            near.shorten(ShapeEnd::Head, radius)?;
            far.shorten(ShapeEnd::Tail, radius)?;
            arms.push(Arm {
                node: Some(id),
                origin: id,
                shape: near,
                end: ShapeEnd::Head,
            });
            arms.push(Arm {
                node: None,
                origin: id,
                shape: far,
                end: ShapeEnd::Tail,
            });
        }
    }

    if arms.len() < 3 {
        return Err(BuildError::InvalidInput(format!(
            "an intersection needs at least three road ends, found {}",
            arms.len()
        ))
        .into());
    }

    let mut ends = Vec::with_capacity(arms.len());
    for arm in &arms {
        let end = arm.shape.end_point(arm.end).ok_or(ShapeError::Empty)?;
        ends.push(end);
    }
    let mut ring: Vec<Point3> = ends.iter().map(AxisPoint::point).collect();
    ring.sort_by(|a, b| angle_around(point, a).total_cmp(&angle_around(point, b)));
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    let junction = Shape::new(&ring, width, None, None);

    // Commit.
    let mut ids = Vec::with_capacity(arms.len());
    for arm in arms {
        let id = match arm.node {
            Some(id) => {
                graph.set_shape(id, arm.shape)?;
                id
            }
            None => {
                let id = graph.add_node(NodeKind::Road, arm.shape);
                hand_over(graph, arm.origin, id, Some(point))?;
                id
            }
        };
        ids.push(id);
    }
    for (a, b, middle) in loop_links {
        graph.connect(ids[a], ids[b], middle)?;
    }
    for &id in &ids {
        drop_stale_connections(graph, id)?;
    }

    let junction_id = graph.add_node(NodeKind::Intersection, junction);
    for (&id, end) in ids.iter().zip(ends) {
        graph.connect(id, junction_id, end)?;
    }
    Ok(junction_id)
}

fn angle_around(centre: &Point3, p: &Point3) -> f64 {
    (p.z - centre.z).atan2(p.x - centre.x)
}
