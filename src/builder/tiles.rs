use crate::config::NetworkConfig;
use crate::error::{BuildError, Result};
use crate::geometry::Shape;
use crate::graph::{Entry, GridPlacement, NodeId, NodeKind, RoadGraph};
use crate::math::Point3;

/// Centerline of a tile in world space.
///
/// Straight roads run border to border, curves bend through the cell centre,
/// spawners run from the centre out to their single entry and intersections
/// loop through all four border midpoints.
fn tile_axis(kind: NodeKind, placement: &GridPlacement, config: &NetworkConfig) -> Vec<Point3> {
    let unit = config.grid_unit();
    let elevation = config.elevation();
    let border = |entry: Entry| placement.border_point(entry, unit, elevation);
    let centre = placement.centre(unit, elevation);

    match (kind, placement.entries(kind).as_slice()) {
        (NodeKind::Road, &[a, b]) => vec![border(a), border(b)],
        (NodeKind::Curve, &[a, b]) => vec![border(a), centre, border(b)],
        (NodeKind::Spawner, &[a]) => vec![centre, border(a)],
        _ => {
            let mut ring: Vec<Point3> = [Entry::North, Entry::East, Entry::South, Entry::West]
                .into_iter()
                .map(border)
                .collect();
            ring.push(border(Entry::North));
            ring
        }
    }
}

fn occupant(graph: &RoadGraph, cell: [i32; 3]) -> Option<NodeId> {
    graph
        .iter()
        .find(|n| n.placement().is_some_and(|p| p.cell == cell))
        .map(|n| n.id())
}

/// Places a tile in a free grid cell and links it with every neighbouring
/// tile whose entry faces one of its own.
pub(super) fn place_tile(
    graph: &mut RoadGraph,
    kind: NodeKind,
    cell: [i32; 3],
    rotation: u8,
) -> Result<NodeId> {
    if occupant(graph, cell).is_some() {
        return Err(BuildError::InvalidInput(format!("cell {cell:?} is occupied")).into());
    }
    let placement = GridPlacement::new(cell, rotation);
    let axis = tile_axis(kind, &placement, graph.config());
    let shape = Shape::new(&axis, graph.config().road_width(), None, None);
    let id = graph.add_placed_node(kind, shape, placement);

    let neighbours: Vec<NodeId> = placement
        .entries(kind)
        .into_iter()
        .filter_map(|entry| {
            let [dx, dy, dz] = entry.offset();
            occupant(graph, [cell[0] + dx, cell[1] + dy, cell[2] + dz])
        })
        .collect();
    for other in neighbours {
        graph.connect_roads(id, other)?;
    }
    Ok(id)
}
