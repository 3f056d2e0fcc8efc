//! The worksheet surface the layout passes read from and write into.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use sheetfit_core::{CellAddress, Grid, Rectangle};

use crate::font::FontDescriptor;

/// Cell values, fonts and the layout fields (wrap, column width) of one sheet.
///
/// Write operations return `Err(String)` when the backing model refuses a
/// value (for example a column past the format's limit).
pub trait WorksheetModel {
    fn cell_value(&self, cell: CellAddress) -> Option<&str>;

    fn set_cell_value(&mut self, cell: CellAddress, value: Option<String>);

    fn cell_font(&self, cell: CellAddress) -> FontDescriptor;

    fn set_cell_wrap(&mut self, cell: CellAddress, wrap: bool) -> Result<(), String>;

    /// Bulk form of [`set_cell_wrap`](Self::set_cell_wrap). Models with
    /// range styling should override this.
    fn set_range_wrap(&mut self, range: &Rectangle, wrap: bool) -> Result<(), String> {
        for cell in range.cells() {
            self.set_cell_wrap(cell, wrap)?;
        }
        Ok(())
    }

    fn set_column_width(&mut self, col: usize, width: f64) -> Result<(), String>;

    /// Raw dump of all values.
    fn to_grid(&self) -> Grid;
}

/// In-memory worksheet.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    title: String,
    grid: Grid,
    default_font: FontDescriptor,
    fonts: FxHashMap<CellAddress, FontDescriptor>,
    /// Wrap assignments in application order; the last one covering a cell wins
    wrap_layers: Vec<(Rectangle, bool)>,
    column_widths: BTreeMap<usize, f64>,
    selection: Option<Rectangle>,
}

impl Worksheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn from_grid(title: impl Into<String>, grid: Grid) -> Self {
        Self {
            grid,
            ..Self::new(title)
        }
    }

    pub fn with_default_font(mut self, font: FontDescriptor) -> Self {
        self.default_font = font;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn default_font(&self) -> &FontDescriptor {
        &self.default_font
    }

    /// Override the font of one cell.
    pub fn set_cell_font(&mut self, cell: CellAddress, font: FontDescriptor) {
        self.fonts.insert(cell, font);
    }

    pub fn set_range_font(&mut self, range: &Rectangle, font: &FontDescriptor) {
        for cell in range.cells() {
            self.fonts.insert(cell, font.clone());
        }
    }

    pub fn is_wrapped(&self, cell: CellAddress) -> bool {
        self.wrap_layers
            .iter()
            .rev()
            .find(|(range, _)| range.contains(cell))
            .is_some_and(|(_, wrap)| *wrap)
    }

    pub fn column_width(&self, col: usize) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> &BTreeMap<usize, f64> {
        &self.column_widths
    }

    pub fn selection(&self) -> Option<Rectangle> {
        self.selection
    }

    pub fn set_selection(&mut self, range: Rectangle) {
        self.selection = Some(range);
    }
}

impl WorksheetModel for Worksheet {
    fn cell_value(&self, cell: CellAddress) -> Option<&str> {
        self.grid.get(cell)
    }

    fn set_cell_value(&mut self, cell: CellAddress, value: Option<String>) {
        self.grid.set(cell, value);
    }

    fn cell_font(&self, cell: CellAddress) -> FontDescriptor {
        self.fonts.get(&cell).unwrap_or(&self.default_font).clone()
    }

    fn set_cell_wrap(&mut self, cell: CellAddress, wrap: bool) -> Result<(), String> {
        self.wrap_layers.push((Rectangle::single(cell), wrap));
        Ok(())
    }

    fn set_range_wrap(&mut self, range: &Rectangle, wrap: bool) -> Result<(), String> {
        self.wrap_layers.push((*range, wrap));
        Ok(())
    }

    fn set_column_width(&mut self, col: usize, width: f64) -> Result<(), String> {
        if !width.is_finite() || width < 0.0 {
            return Err(format!("invalid width {width} for column {col}"));
        }
        self.column_widths.insert(col, width);
        Ok(())
    }

    fn to_grid(&self) -> Grid {
        self.grid.clone()
    }
}
