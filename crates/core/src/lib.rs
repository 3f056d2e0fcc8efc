//! `sheetfit-core`: grid and range primitives.
//!
//! Pure data crate: sparse grids, cell addresses, inclusive rectangles,
//! A1-style range addresses and bounding-box discovery.

pub mod bounds;
pub mod grid;
pub mod range;

pub use bounds::{find_bounds, find_bounds_with, BoundsScan};
pub use grid::{CellAddress, Grid, Rectangle};
pub use range::{
    column_index_to_letters, letters_to_column_index, parse_range_address, to_range_address,
    RangeError,
};
