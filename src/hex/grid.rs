//! Board-bounded hex queries.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::HexId;

/// The six cube directions, as `(dq, dr)` offsets.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// A hexagonal board of a fixed radius centered on the origin.
///
/// All queries clip their results to the board: hexes further than
/// `radius` from the center are never returned.
///
/// ```
/// use hexbots::hex::{HexGrid, HexId};
///
/// let grid = HexGrid::new(3);
/// assert_eq!(grid.all_hexes().len(), 37);
///
/// // A corner hex only has three on-board neighbors.
/// assert_eq!(grid.adjacent(HexId::new(3, 0)).len(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexGrid {
    radius: u32,
}

impl HexGrid {
    #[must_use]
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }

    #[must_use]
    pub const fn radius(self) -> u32 {
        self.radius
    }

    /// Is this hex on the board?
    #[must_use]
    pub fn contains(self, hex: HexId) -> bool {
        hex.length() <= self.radius
    }

    /// Neighbors of a hex that lie on the board.
    #[must_use]
    pub fn adjacent(self, hex: HexId) -> SmallVec<[HexId; 6]> {
        DIRECTIONS
            .iter()
            .map(|&(dq, dr)| hex.offset(dq, dr))
            .filter(|&h| self.contains(h))
            .collect()
    }

    /// Step distance between two hexes.
    #[must_use]
    pub fn distance(self, a: HexId, b: HexId) -> u32 {
        a.distance(b)
    }

    /// All on-board hexes within `n` steps of `center` (inclusive), in
    /// coordinate order.
    #[must_use]
    pub fn hexes_within_radius(self, center: HexId, n: u32) -> Vec<HexId> {
        let n = i32::try_from(n).unwrap_or(i32::MAX).min(2 * self.radius as i32);
        let mut hexes = Vec::new();
        for dq in -n..=n {
            let lo = (-n).max(-dq - n);
            let hi = n.min(-dq + n);
            for dr in lo..=hi {
                let hex = center.offset(dq, dr);
                if self.contains(hex) {
                    hexes.push(hex);
                }
            }
        }
        hexes
    }

    /// Every hex on the board, in coordinate order.
    #[must_use]
    pub fn all_hexes(self) -> Vec<HexId> {
        self.hexes_within_radius(HexId::origin(), self.radius)
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size() {
        assert_eq!(HexGrid::new(0).all_hexes().len(), 1);
        assert_eq!(HexGrid::new(1).all_hexes().len(), 7);
        assert_eq!(HexGrid::new(3).all_hexes().len(), 37);
    }

    #[test]
    fn test_adjacent_center() {
        let grid = HexGrid::new(3);
        let neighbors = grid.adjacent(HexId::origin());
        assert_eq!(neighbors.len(), 6);
        assert!(neighbors.iter().all(|h| h.length() == 1));
    }

    #[test]
    fn test_adjacent_clipped_at_edge() {
        let grid = HexGrid::new(3);
        // Edge (non-corner) hex has four on-board neighbors
        assert_eq!(grid.adjacent(HexId::new(3, -1)).len(), 4);
        // Corner
        assert_eq!(grid.adjacent(HexId::new(-3, 0)).len(), 3);
    }

    #[test]
    fn test_within_radius() {
        let grid = HexGrid::new(3);
        let near = grid.hexes_within_radius(HexId::origin(), 1);
        assert_eq!(near.len(), 7);
        assert!(near.contains(&HexId::origin()));

        let corner = grid.hexes_within_radius(HexId::new(3, 0), 1);
        assert_eq!(corner.len(), 4);
        assert!(corner.iter().all(|&h| grid.contains(h)));
    }

    #[test]
    fn test_within_radius_covers_board() {
        let grid = HexGrid::new(3);
        assert_eq!(grid.hexes_within_radius(HexId::new(-3, 0), 6).len(), 37);
        assert_eq!(grid.hexes_within_radius(HexId::new(-3, 0), 100).len(), 37);
    }
}
