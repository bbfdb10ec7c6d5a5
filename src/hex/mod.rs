//! Hex grid geometry.
//!
//! The board is a hexagon of hexes addressed with cube coordinates
//! (`q + r + s = 0`). Each hex has a canonical string key (`"q,r,s"`)
//! which is how boards are keyed in snapshots.
//!
//! - [`HexId`]: a single cube coordinate
//! - [`HexGrid`]: adjacency, distance and range queries clipped to the board

mod grid;
mod id;

pub use grid::HexGrid;
pub use id::HexId;
