//! Sparse text grids and the coordinates used to address them.

use serde::{Deserialize, Serialize};

/// A cell position, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular block of cells, inclusive on both ends.
///
/// Always complete: an "absent" rectangle is expressed as `Option<Rectangle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl Rectangle {
    /// Create a new rectangle, normalizing so min <= max on both axes.
    pub fn new(r1: usize, r2: usize, c1: usize, c2: usize) -> Self {
        Self {
            row_min: r1.min(r2),
            row_max: r1.max(r2),
            col_min: c1.min(c2),
            col_max: c1.max(c2),
        }
    }

    /// Create a rectangle spanning two corner cells.
    pub fn spanning(a: CellAddress, b: CellAddress) -> Self {
        Self::new(a.row, b.row, a.col, b.col)
    }

    /// Create a single-cell rectangle.
    pub fn single(cell: CellAddress) -> Self {
        Self::spanning(cell, cell)
    }

    pub fn top_left(&self) -> CellAddress {
        CellAddress::new(self.row_min, self.col_min)
    }

    pub fn bottom_right(&self) -> CellAddress {
        CellAddress::new(self.row_max, self.col_max)
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.row_min..=self.row_max
    }

    pub fn cols(&self) -> std::ops::RangeInclusive<usize> {
        self.col_min..=self.col_max
    }

    pub fn contains(&self, cell: CellAddress) -> bool {
        self.rows().contains(&cell.row) && self.cols().contains(&cell.col)
    }

    /// Number of cells in this rectangle.
    pub fn cell_count(&self) -> usize {
        (self.row_max - self.row_min + 1) * (self.col_max - self.col_min + 1)
    }

    /// Iterate over all cells (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |r| cols.clone().map(move |c| CellAddress::new(r, c)))
    }
}

/// A ragged 2D grid of optional text values.
///
/// Rows may have different lengths. A cell counts as present only when it
/// holds a non-empty string; `None` and `""` are both empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Option<String>>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from rows, folding empty strings into `None`.
    pub fn from_rows<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(Into::into).filter(|s: &String| !s.is_empty()))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }

    /// Value at `cell`, or `None` when the cell is empty or outside the grid.
    pub fn get(&self, cell: CellAddress) -> Option<&str> {
        self.rows
            .get(cell.row)
            .and_then(|row| row.get(cell.col))
            .and_then(|value| value.as_deref())
    }

    /// Set or clear a cell, growing the grid as needed.
    pub fn set(&mut self, cell: CellAddress, value: Option<String>) {
        let value = value.filter(|s| !s.is_empty());
        if value.is_none() && self.get(cell).is_none() {
            return;
        }
        if self.rows.len() <= cell.row {
            self.rows.resize_with(cell.row + 1, Vec::new);
        }
        let row = &mut self.rows[cell.row];
        if row.len() <= cell.col {
            row.resize(cell.col + 1, None);
        }
        row[cell.col] = value;
    }
}
