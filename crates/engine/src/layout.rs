//! Post-generation layout passes over a worksheet.
//!
//! Both passes work on an explicit range or, when none is given, on the
//! rectangle enclosing every populated cell. An empty sheet makes them
//! no-ops.

use std::sync::Arc;

use sheetfit_core::{find_bounds_with, parse_range_address, BoundsScan, Rectangle};

use crate::column_width::{ColumnWidthCalculator, ColumnWidths};
use crate::error::LayoutError;
use crate::font::{FontFileResolver, TrueTypeFontResolver};
use crate::font_path::FontSearchPath;
use crate::metrics::{GlyphMetricsProvider, TextMetricsMeasurer};
use crate::truetype::TrueTypeMetrics;
use crate::worksheet::WorksheetModel;

pub struct LayoutEngine<M, R> {
    measurer: TextMetricsMeasurer<M, R>,
    font_path: Arc<FontSearchPath>,
    bounds_scan: BoundsScan,
}

impl LayoutEngine<TrueTypeMetrics, TrueTypeFontResolver> {
    /// Engine measuring with real font files found through `font_path`.
    pub fn truetype(font_path: Arc<FontSearchPath>) -> Self {
        let resolver = TrueTypeFontResolver::new(Arc::clone(&font_path));
        Self::new(TextMetricsMeasurer::new(TrueTypeMetrics::new(), resolver), font_path)
    }
}

impl<M: GlyphMetricsProvider, R: FontFileResolver> LayoutEngine<M, R> {
    /// `font_path` must be the search path the measurer's resolver reads.
    pub fn new(measurer: TextMetricsMeasurer<M, R>, font_path: Arc<FontSearchPath>) -> Self {
        Self {
            measurer,
            font_path,
            bounds_scan: BoundsScan::default(),
        }
    }

    pub fn with_bounds_scan(mut self, scan: BoundsScan) -> Self {
        self.bounds_scan = scan;
        self
    }

    pub fn measurer(&self) -> &TextMetricsMeasurer<M, R> {
        &self.measurer
    }

    pub fn font_path(&self) -> &FontSearchPath {
        &self.font_path
    }

    pub fn bounds_scan(&self) -> BoundsScan {
        self.bounds_scan
    }

    /// Rectangle enclosing every populated cell of `model`.
    pub fn active_range(&self, model: &dyn WorksheetModel) -> Option<Rectangle> {
        find_bounds_with(&model.to_grid(), self.bounds_scan)
    }

    /// Wrap `range`, or the active range. Returns the range wrapped, if any.
    pub fn wrap_text(
        &self,
        model: &mut dyn WorksheetModel,
        range: Option<Rectangle>,
    ) -> Result<Option<Rectangle>, LayoutError> {
        let range = range.or_else(|| self.active_range(model));
        crate::wrap::apply_wrap(model, range)?;
        Ok(range)
    }

    /// [`wrap_text`](Self::wrap_text) with an A1 range such as `A1:Z100`.
    pub fn wrap_text_at(&self, model: &mut dyn WorksheetModel, address: &str) -> Result<Option<Rectangle>, LayoutError> {
        let range = parse_range_address(address)?;
        self.wrap_text(model, Some(range))
    }

    /// Fit column widths to content, measuring with fonts from `font_dir`.
    ///
    /// The font search path is switched to `font_dir` for the duration of
    /// the pass and restored afterwards, whether or not it succeeds.
    pub fn adjust_column_widths(
        &self,
        model: &mut dyn WorksheetModel,
        range: Option<Rectangle>,
        font_dir: &str,
    ) -> Result<ColumnWidths, LayoutError> {
        self.font_path.run_scoped(font_dir, || {
            let Some(range) = range.or_else(|| self.active_range(model)) else {
                return Ok(ColumnWidths::new());
            };
            ColumnWidthCalculator::new(&self.measurer).apply(model, &range)
        })
    }

    /// [`adjust_column_widths`](Self::adjust_column_widths) with an A1 range.
    pub fn adjust_column_widths_at(
        &self,
        model: &mut dyn WorksheetModel,
        address: &str,
        font_dir: &str,
    ) -> Result<ColumnWidths, LayoutError> {
        let range = parse_range_address(address)?;
        self.adjust_column_widths(model, Some(range), font_dir)
    }
}
