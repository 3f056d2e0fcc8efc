//! Column auto-fit: each column takes the widest fit width of its cells.

use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::path::PathBuf;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use sheetfit_core::{column_index_to_letters, CellAddress, Grid, Rectangle};

use crate::error::LayoutError;
use crate::font::{FontDescriptor, FontFileResolver, FontKey};
use crate::metrics::{GlyphMetricsProvider, TextMetricsMeasurer};
use crate::worksheet::WorksheetModel;

/// Column index -> width. Columns with no populated cell are absent.
pub type ColumnWidths = BTreeMap<usize, f64>;

pub struct ColumnWidthCalculator<'a, M, R> {
    measurer: &'a TextMetricsMeasurer<M, R>,
}

impl<'a, M: GlyphMetricsProvider, R: FontFileResolver> ColumnWidthCalculator<'a, M, R> {
    pub fn new(measurer: &'a TextMetricsMeasurer<M, R>) -> Self {
        Self { measurer }
    }

    /// Width per column of `range`. Unclamped.
    ///
    /// Any measurement failure aborts the whole computation.
    pub fn compute<F>(&self, grid: &Grid, range: &Rectangle, font_of: F) -> Result<ColumnWidths, LayoutError>
    where
        F: Fn(CellAddress) -> FontDescriptor,
    {
        // Font file and padding, resolved once per distinct font
        let mut resolved: FxHashMap<FontKey, (PathBuf, f64)> = FxHashMap::default();
        let mut widths = ColumnWidths::new();

        for col in range.cols() {
            let column_error = |source| LayoutError::Measurement {
                column: column_index_to_letters(col),
                source,
            };

            let mut widest: Option<OrderedFloat<f64>> = None;
            for row in range.rows() {
                let cell = CellAddress::new(row, col);
                let Some(value) = grid.get(cell) else {
                    continue;
                };
                let font = font_of(cell);
                let (file, padding) = match resolved.entry(font.key()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        let file = self.measurer.resolve(&font).map_err(column_error)?;
                        let padding = self.measurer.padding_in(&file, &font).map_err(column_error)?;
                        entry.insert((file, padding))
                    }
                };
                let fit = self
                    .measurer
                    .fit_width_in(file.as_path(), value, &font, *padding)
                    .map_err(column_error)?;
                widest = widest.max(Some(OrderedFloat(fit)));
            }

            if let Some(OrderedFloat(width)) = widest {
                log::debug!("Column {} fit width {:.3}", column_index_to_letters(col), width);
                widths.insert(col, width);
            }
        }

        Ok(widths)
    }

    /// Compute widths for `range` from the model's own values and fonts,
    /// then write them into the model. Nothing is written if any cell fails.
    pub fn apply(&self, model: &mut dyn WorksheetModel, range: &Rectangle) -> Result<ColumnWidths, LayoutError> {
        let grid = model.to_grid();
        let widths = self.compute(&grid, range, |cell| model.cell_font(cell))?;
        for (&col, &width) in &widths {
            model.set_column_width(col, width).map_err(LayoutError::Worksheet)?;
        }
        Ok(widths)
    }
}
