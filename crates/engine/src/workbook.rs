//! Workbooks assembled from sheet specs, with a completion hook per sheet.
//!
//! Each [`SheetSpec`] carries its [`LayoutCompleteHandler`] from
//! construction; [`Workbook::build`] materializes the sheet and fires the
//! handler exactly once, after all values are in place.

use std::fmt;

use sheetfit_config::settings::Settings;
use sheetfit_core::{CellAddress, Grid, Rectangle};

use crate::error::LayoutError;
use crate::font::{FontDescriptor, FontFileResolver, TrueTypeFontResolver};
use crate::font_path::FontSearchPath;
use crate::layout::LayoutEngine;
use crate::metrics::GlyphMetricsProvider;
use crate::truetype::TrueTypeMetrics;
use crate::worksheet::Worksheet;

/// What a handler sees once a sheet has been populated.
pub struct LayoutContext<'a> {
    pub title: &'a str,
    /// Rows the sheet was built from
    pub source: &'a Grid,
    pub worksheet: &'a mut Worksheet,
}

pub trait LayoutCompleteHandler {
    fn on_layout_complete(&self, ctx: &mut LayoutContext<'_>) -> Result<(), LayoutError>;
}

impl<F> LayoutCompleteHandler for F
where
    F: Fn(&mut LayoutContext<'_>) -> Result<(), LayoutError>,
{
    fn on_layout_complete(&self, ctx: &mut LayoutContext<'_>) -> Result<(), LayoutError> {
        self(ctx)
    }
}

/// Leaves the sheet as built.
pub struct NoopHandler;

impl LayoutCompleteHandler for NoopHandler {
    fn on_layout_complete(&self, _ctx: &mut LayoutContext<'_>) -> Result<(), LayoutError> {
        Ok(())
    }
}

/// Wraps the populated range, fits column widths and puts the cursor on A1.
pub struct AutoFitHandler<M, R> {
    engine: LayoutEngine<M, R>,
    font_dir: String,
    wrap_text: bool,
    adjust_widths: bool,
    reset_selection: bool,
}

impl AutoFitHandler<TrueTypeMetrics, TrueTypeFontResolver> {
    pub fn from_settings(settings: &Settings) -> Self {
        let engine = LayoutEngine::truetype(FontSearchPath::global()).with_bounds_scan(settings.bounds_scan);
        Self::new(engine, settings.font_directory.clone())
            .with_wrap_text(settings.wrap_text)
            .with_adjust_widths(settings.adjust_column_widths)
            .with_reset_selection(settings.reset_selection)
    }
}

impl<M: GlyphMetricsProvider, R: FontFileResolver> AutoFitHandler<M, R> {
    pub fn new(engine: LayoutEngine<M, R>, font_dir: impl Into<String>) -> Self {
        Self {
            engine,
            font_dir: font_dir.into(),
            wrap_text: true,
            adjust_widths: true,
            reset_selection: true,
        }
    }

    pub fn with_wrap_text(mut self, on: bool) -> Self {
        self.wrap_text = on;
        self
    }

    pub fn with_adjust_widths(mut self, on: bool) -> Self {
        self.adjust_widths = on;
        self
    }

    pub fn with_reset_selection(mut self, on: bool) -> Self {
        self.reset_selection = on;
        self
    }

    pub fn engine(&self) -> &LayoutEngine<M, R> {
        &self.engine
    }
}

impl<M: GlyphMetricsProvider, R: FontFileResolver> LayoutCompleteHandler for AutoFitHandler<M, R> {
    fn on_layout_complete(&self, ctx: &mut LayoutContext<'_>) -> Result<(), LayoutError> {
        if self.wrap_text {
            self.engine.wrap_text(ctx.worksheet, None)?;
        }
        if self.adjust_widths {
            let widths = self.engine.adjust_column_widths(ctx.worksheet, None, &self.font_dir)?;
            log::info!("Sheet '{}': fitted {} column(s)", ctx.title, widths.len());
        }
        // Styling passes move the cursor; park it top-left
        if self.reset_selection {
            ctx.worksheet.set_selection(Rectangle::single(CellAddress::new(0, 0)));
        }
        Ok(())
    }
}

pub struct SheetSpec {
    title: String,
    rows: Grid,
    handler: Box<dyn LayoutCompleteHandler>,
}

impl SheetSpec {
    pub fn new(title: impl Into<String>, rows: Grid, handler: impl LayoutCompleteHandler + 'static) -> Self {
        Self {
            title: title.into(),
            rows,
            handler: Box::new(handler),
        }
    }

    /// A sheet with no completion work.
    pub fn plain(title: impl Into<String>, rows: Grid) -> Self {
        Self::new(title, rows, NoopHandler)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &Grid {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Grid {
        &mut self.rows
    }
}

impl fmt::Debug for SheetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetSpec")
            .field("title", &self.title)
            .field("rows", &self.rows.row_count())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<SheetSpec>,
    default_font: FontDescriptor,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new().with_default_font(FontDescriptor::from_settings(settings))
    }

    /// Font for every cell without an explicit one.
    pub fn with_default_font(mut self, font: FontDescriptor) -> Self {
        self.default_font = font;
        self
    }

    pub fn add_sheet(&mut self, sheet: SheetSpec) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[SheetSpec] {
        &self.sheets
    }

    /// Materialize every sheet and run its completion handler.
    ///
    /// Stops at the first handler error.
    pub fn build(&self) -> Result<Vec<Worksheet>, LayoutError> {
        let mut built = Vec::with_capacity(self.sheets.len());
        for spec in &self.sheets {
            let mut worksheet = Worksheet::from_grid(spec.title.clone(), spec.rows.clone())
                .with_default_font(self.default_font.clone());
            let mut ctx = LayoutContext {
                title: &spec.title,
                source: &spec.rows,
                worksheet: &mut worksheet,
            };
            spec.handler.on_layout_complete(&mut ctx)?;
            built.push(worksheet);
        }
        log::info!("Built {} sheet(s)", built.len());
        Ok(built)
    }
}
