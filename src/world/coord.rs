//! Grid coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position on the logical grid.
///
/// Signed so that probes one step past the edge (x = -1) are representable;
/// stored walls and entities always satisfy `0 <= x, y < grid_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by a delta, saturating at the i32 range.
    pub fn offset(self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Coordinate shifted by a delta, or None if it would overflow.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Coord> {
        Some(Coord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// True if the coordinate lies inside a square grid of the given size.
    pub fn in_bounds(self, size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
