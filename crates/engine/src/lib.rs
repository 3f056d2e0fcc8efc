//! `sheetfit-engine`: bounds-aware layout passes for generated sheets.
//!
//! Measures cell text with real glyph metrics to fit column widths, applies
//! wrap styling, and runs per-sheet completion hooks while building a
//! workbook.

pub mod column_width;
pub mod error;
pub mod font;
pub mod font_path;
pub mod layout;
pub mod metrics;
pub mod truetype;
pub mod workbook;
pub mod worksheet;
pub mod wrap;

pub use column_width::{ColumnWidthCalculator, ColumnWidths};
pub use error::{LayoutError, MeasurementError};
pub use font::{FontDescriptor, FontFileResolver, FontFiles, TrueTypeFontResolver};
pub use font_path::FontSearchPath;
pub use layout::LayoutEngine;
pub use metrics::{BoundingBox, GlyphMetricsProvider, TextMetricsMeasurer, PIXELS_PER_MILLIMETER};
pub use truetype::TrueTypeMetrics;
pub use workbook::{AutoFitHandler, LayoutCompleteHandler, LayoutContext, NoopHandler, SheetSpec, Workbook};
pub use worksheet::{Worksheet, WorksheetModel};
