use super::NodeKind;
use crate::error::GraphError;
use crate::math::Point3;

/// A side of a grid cell through which a tile can be entered.
///
/// Opposite entries differ only in their lowest bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Entry {
    /// +Z.
    North = 0,
    /// -Z.
    South = 1,
    /// +X.
    East = 2,
    /// -X.
    West = 3,
}

/// Clockwise order, seen from above.
const CLOCKWISE: [Entry; 4] = [Entry::North, Entry::East, Entry::South, Entry::West];

impl Entry {
    pub const ALL: [Entry; 4] = [Entry::North, Entry::South, Entry::East, Entry::West];

    #[must_use]
    pub fn opposite(self) -> Self {
        Self::ALL[(self as usize) ^ 1]
    }

    /// The entry reached after `quarter_turns` clockwise rotations.
    #[must_use]
    pub fn rotated(self, quarter_turns: u8) -> Self {
        let start = CLOCKWISE.iter().position(|&e| e == self).unwrap_or(0);
        CLOCKWISE[(start + usize::from(quarter_turns)) % 4]
    }

    /// Cell offset of the neighbour behind this entry.
    #[must_use]
    pub fn offset(self) -> [i32; 3] {
        match self {
            Self::North => [0, 0, 1],
            Self::South => [0, 0, -1],
            Self::East => [1, 0, 0],
            Self::West => [-1, 0, 0],
        }
    }
}

/// Position and orientation of a tile on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPlacement {
    pub cell: [i32; 3],
    /// Clockwise quarter turns.
    pub rotation: u8,
}

impl GridPlacement {
    #[must_use]
    pub fn new(cell: [i32; 3], rotation: u8) -> Self {
        Self {
            cell,
            rotation: rotation % 4,
        }
    }

    /// Entries a tile of the given kind offers in this orientation.
    #[must_use]
    pub fn entries(&self, kind: NodeKind) -> Vec<Entry> {
        let base: &[Entry] = match kind {
            NodeKind::Road => &[Entry::West, Entry::East],
            NodeKind::Curve => &[Entry::North, Entry::East],
            NodeKind::Intersection => &Entry::ALL,
            NodeKind::Spawner => &[Entry::North],
        };
        base.iter().map(|e| e.rotated(self.rotation)).collect()
    }

    /// World position of the cell centre.
    #[must_use]
    pub fn centre(&self, unit: f64, elevation: f64) -> Point3 {
        Point3::new(
            f64::from(self.cell[0]) * unit,
            elevation,
            f64::from(self.cell[2]) * unit,
        )
    }

    /// World position of the midpoint of the cell border behind `entry`.
    #[must_use]
    pub fn border_point(&self, entry: Entry, unit: f64, elevation: f64) -> Point3 {
        let [dx, _, dz] = entry.offset();
        let centre = self.centre(unit, elevation);
        Point3::new(
            centre.x + f64::from(dx) * unit * 0.5,
            elevation,
            centre.z + f64::from(dz) * unit * 0.5,
        )
    }
}

/// Whether two cells are exactly one unit apart along a single planar axis.
#[must_use]
pub fn is_adjacent(lhs: [i32; 3], rhs: [i32; 3]) -> bool {
    relative_entries(lhs, rhs).is_ok()
}

/// The entries through which `lhs` and `rhs` face each other.
///
/// # Errors
///
/// Returns `GraphError::NotAdjacent` for diagonal, stacked or distant cells.
pub fn relative_entries(lhs: [i32; 3], rhs: [i32; 3]) -> Result<(Entry, Entry), GraphError> {
    let delta = [rhs[0] - lhs[0], rhs[1] - lhs[1], rhs[2] - lhs[2]];
    let entry = match delta {
        [1, 0, 0] => Entry::East,
        [-1, 0, 0] => Entry::West,
        [0, 0, 1] => Entry::North,
        [0, 0, -1] => Entry::South,
        _ => return Err(GraphError::NotAdjacent { lhs, rhs }),
    };
    Ok((entry, entry.opposite()))
}
