//! Bounding-box discovery over sparse grids.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Rectangle};

/// Search order used by [`find_bounds_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundsScan {
    /// Examine every cell of every row.
    #[default]
    Precise,
    /// Within each row, scan only columns right of the current maximum.
    ///
    /// Matches the legacy generator's output. `col_min` is fixed by the first
    /// populated row, so a later row with a cell further left does not lower
    /// it: `[[_, "a"], ["b", _]]` yields `B1:B2` here but `A1:B2` precisely.
    RightOfMax,
}

/// Minimal rectangle enclosing every non-empty cell, or `None` for an empty grid.
pub fn find_bounds(grid: &Grid) -> Option<Rectangle> {
    find_bounds_with(grid, BoundsScan::Precise)
}

pub fn find_bounds_with(grid: &Grid, scan: BoundsScan) -> Option<Rectangle> {
    match scan {
        BoundsScan::Precise => scan_precise(grid),
        BoundsScan::RightOfMax => scan_right_of_max(grid),
    }
}

fn scan_precise(grid: &Grid) -> Option<Rectangle> {
    let mut bounds: Option<Rectangle> = None;

    for (row_idx, row) in grid.rows().iter().enumerate() {
        let mut present = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(|(col_idx, _)| col_idx);

        let Some(first) = present.next() else {
            continue;
        };
        let last = present.last().unwrap_or(first);

        bounds = Some(match bounds {
            None => Rectangle::new(row_idx, row_idx, first, last),
            Some(b) => Rectangle {
                row_min: b.row_min,
                row_max: row_idx,
                col_min: b.col_min.min(first),
                col_max: b.col_max.max(last),
            },
        });
    }

    bounds
}

fn scan_right_of_max(grid: &Grid) -> Option<Rectangle> {
    let mut row_min: Option<usize> = None;
    let mut row_max: Option<usize> = None;
    let mut col_min: Option<usize> = None;
    let mut col_max: Option<usize> = None;

    for (row_idx, row) in grid.rows().iter().enumerate() {
        if row.iter().all(Option::is_none) {
            continue;
        }
        row_min.get_or_insert(row_idx);
        row_max = Some(row_idx);

        let start = col_max.map_or(0, |c| c + 1);
        for col_idx in start..row.len() {
            if row[col_idx].is_some() {
                col_min.get_or_insert(col_idx);
                col_max = Some(col_idx);
            }
        }
    }

    // A populated row always yields at least one column on first discovery
    match (row_min, row_max, col_min, col_max) {
        (Some(r0), Some(r1), Some(c0), Some(c1)) => Some(Rectangle::new(r0, r1, c0, c1)),
        _ => None,
    }
}
