//! End-to-end layout passes with deterministic metrics.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sheetfit_core::{BoundsScan, CellAddress, Grid, Rectangle};
use sheetfit_engine::{
    AutoFitHandler, BoundingBox, FontDescriptor, FontFileResolver, FontSearchPath, GlyphMetricsProvider,
    LayoutContext, LayoutEngine, LayoutError, MeasurementError, SheetSpec, TextMetricsMeasurer, Workbook,
    Worksheet, WorksheetModel, PIXELS_PER_MILLIMETER,
};

/// One pixel per char per point. Remembers every file it was asked about.
#[derive(Default)]
struct Monospace {
    files: RefCell<Vec<PathBuf>>,
}

impl GlyphMetricsProvider for Monospace {
    fn bounding_box(&self, point_size: f64, _angle: f64, font_file: &Path, text: &str) -> Result<BoundingBox, MeasurementError> {
        self.files.borrow_mut().push(font_file.to_path_buf());
        let width = text.chars().count() as f64 * point_size;
        Ok(BoundingBox { x_min: 0.0, y_min: 0.0, x_max: width, y_max: point_size })
    }
}

/// `<search path><family>.ttf`, except for the family "Missing".
struct SearchPathResolver {
    search_path: Arc<FontSearchPath>,
}

impl FontFileResolver for SearchPathResolver {
    fn resolve(&self, font: &FontDescriptor) -> Result<PathBuf, MeasurementError> {
        if font.family == "Missing" {
            return Err(MeasurementError::UnknownFont { family: font.family.clone() });
        }
        Ok(PathBuf::from(format!("{}{}.ttf", self.search_path.current(), font.family)))
    }
}

fn engine(initial_dir: &str) -> LayoutEngine<Monospace, SearchPathResolver> {
    let search_path = Arc::new(FontSearchPath::new(initial_dir));
    let resolver = SearchPathResolver { search_path: Arc::clone(&search_path) };
    LayoutEngine::new(TextMetricsMeasurer::new(Monospace::default(), resolver), search_path)
}

fn grid(rows: &[&[Option<&str>]]) -> Grid {
    Grid::from_rows(rows.iter().map(|r| r.iter().copied()))
}

/// Fit width of the widest line at point size `size`, padding included.
fn expected_width(widest_chars: usize, size: f64) -> f64 {
    let padding = (size * 1.07).ceil();
    (widest_chars as f64 * size + padding) / PIXELS_PER_MILLIMETER
}

#[test]
fn test_empty_sheet_is_a_no_op() {
    let engine = engine("/initial/");
    let mut ws = Worksheet::new("empty");

    assert_eq!(engine.wrap_text(&mut ws, None).unwrap(), None);
    let widths = engine.adjust_column_widths(&mut ws, None, "/scoped").unwrap();

    assert!(widths.is_empty());
    assert!(ws.column_widths().is_empty());
    assert_eq!(engine.font_path().current(), "/initial/");
}

#[test]
fn test_diagonal_sheet_covers_both_columns() {
    let engine = engine("/initial/");
    let font = FontDescriptor::new("Any", 11.0);
    let mut ws = Worksheet::from_grid("s", grid(&[&[None, Some("a")], &[Some("b"), None]]))
        .with_default_font(font);

    let wrapped = engine.wrap_text(&mut ws, None).unwrap();
    assert_eq!(wrapped, Some("A1:B2".parse().unwrap()));
    for cell in Rectangle::new(0, 1, 0, 1).cells() {
        assert!(ws.is_wrapped(cell), "{cell} not wrapped");
    }

    let widths = engine.adjust_column_widths(&mut ws, None, "/scoped").unwrap();
    assert_eq!(widths.len(), 2);
    assert_eq!(ws.column_width(0), Some(expected_width(1, 11.0)));
    assert_eq!(ws.column_width(1), Some(expected_width(1, 11.0)));
}

#[test]
fn test_right_of_max_scan_skips_left_columns() {
    let engine = engine("/initial/").with_bounds_scan(BoundsScan::RightOfMax);
    let mut ws = Worksheet::from_grid("s", grid(&[&[None, Some("a")], &[Some("b"), None]]));

    let wrapped = engine.wrap_text(&mut ws, None).unwrap();
    assert_eq!(wrapped, Some(Rectangle::new(0, 1, 1, 1)));
    assert!(!ws.is_wrapped(CellAddress::new(1, 0)));

    let widths = engine.adjust_column_widths(&mut ws, None, "/scoped").unwrap();
    assert_eq!(widths.keys().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_multi_line_cell_takes_widest_line() {
    let engine = engine("/initial/");
    let mut ws = Worksheet::from_grid("s", grid(&[&[Some("ab\nabcd")], &[Some("abc")]]))
        .with_default_font(FontDescriptor::new("Any", 10.0));

    engine.adjust_column_widths(&mut ws, None, "/scoped").unwrap();
    assert_eq!(ws.column_width(0), Some(expected_width(4, 10.0)));
}

#[test]
fn test_explicit_range_address() {
    let engine = engine("/initial/");
    let mut ws = Worksheet::from_grid(
        "s",
        grid(&[&[Some("x"), Some("yy"), Some("zzz")], &[Some("x"), Some("yy"), Some("zzz")]]),
    );

    let wrapped = engine.wrap_text_at(&mut ws, "B1:C2").unwrap();
    assert_eq!(wrapped, Some(Rectangle::new(0, 1, 1, 2)));
    assert!(!ws.is_wrapped(CellAddress::new(0, 0)));

    let widths = engine.adjust_column_widths_at(&mut ws, "C1:C2", "/scoped").unwrap();
    assert_eq!(widths.keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(ws.column_width(0), None);

    assert!(matches!(engine.wrap_text_at(&mut ws, "A0"), Err(LayoutError::Range(_))));
}

#[test]
fn test_fonts_resolve_inside_scoped_directory() {
    let engine = engine("/initial/");
    let mut ws = Worksheet::from_grid("s", grid(&[&[Some("a")]]))
        .with_default_font(FontDescriptor::new("Any", 11.0));

    engine.adjust_column_widths(&mut ws, None, "/scoped").unwrap();

    let files = engine.measurer().provider().files.borrow();
    assert!(!files.is_empty());
    assert!(files.iter().all(|f| f == Path::new("/scoped/Any.ttf")));
    assert_eq!(engine.font_path().current(), "/initial/");
}

#[test]
fn test_font_path_restored_after_failed_measurement() {
    let engine = engine("/initial/");
    let mut ws = Worksheet::from_grid("s", grid(&[&[Some("ok"), Some("bad")]]));
    ws.set_cell_font(CellAddress::new(0, 1), FontDescriptor::new("Missing", 11.0));

    let err = engine.adjust_column_widths(&mut ws, None, "C:\\Windows\\Fonts\\").unwrap_err();
    match err {
        LayoutError::Measurement { column, source } => {
            assert_eq!(column, "B");
            assert_eq!(source, MeasurementError::UnknownFont { family: "Missing".into() });
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ws.column_widths().is_empty());
    assert_eq!(engine.font_path().current(), "/initial/");
}

#[test]
fn test_workbook_runs_auto_fit_handler() {
    let handler = AutoFitHandler::new(engine("/initial/"), "/fonts");
    let mut workbook = Workbook::new().with_default_font(FontDescriptor::new("Any", 11.0));
    workbook.add_sheet(SheetSpec::new(
        "Report",
        grid(&[&[Some("Name"), Some("Notes")], &[Some("Ann"), Some("line one\nline two")]]),
        handler,
    ));

    let sheets = workbook.build().unwrap();
    assert_eq!(sheets.len(), 1);

    let ws = &sheets[0];
    assert_eq!(ws.title(), "Report");
    assert_eq!(ws.selection(), Some(Rectangle::single(CellAddress::new(0, 0))));
    assert!(ws.is_wrapped(CellAddress::new(1, 1)));
    assert_eq!(ws.column_width(0), Some(expected_width(4, 11.0)));
    assert_eq!(ws.column_width(1), Some(expected_width(8, 11.0)));
}

#[test]
fn test_handler_switches_are_honored() {
    let handler = AutoFitHandler::new(engine("/initial/"), "/fonts")
        .with_wrap_text(false)
        .with_reset_selection(false);
    let mut workbook = Workbook::new();
    workbook.add_sheet(SheetSpec::new("s", grid(&[&[Some("a")]]), handler));

    let sheets = workbook.build().unwrap();
    assert!(!sheets[0].is_wrapped(CellAddress::new(0, 0)));
    assert_eq!(sheets[0].selection(), None);
    assert_eq!(sheets[0].column_widths().len(), 1);
}

#[test]
fn test_closure_handler_runs_once_per_sheet() {
    let mut workbook = Workbook::new();
    workbook.add_sheet(SheetSpec::new(
        "tagged",
        grid(&[&[Some("a")]]),
        |ctx: &mut LayoutContext<'_>| -> Result<(), LayoutError> {
            assert_eq!(ctx.source.get(CellAddress::new(0, 0)), Some("a"));
            assert!(ctx.worksheet.cell_value(CellAddress::new(0, 1)).is_none());
            ctx.worksheet.set_cell_value(CellAddress::new(0, 1), Some(ctx.title.to_uppercase()));
            Ok(())
        },
    ));
    workbook.add_sheet(SheetSpec::plain("plain", grid(&[&[Some("b")]])));

    let sheets = workbook.build().unwrap();
    assert_eq!(sheets[0].cell_value(CellAddress::new(0, 1)), Some("TAGGED"));
    assert_eq!(sheets[1].cell_value(CellAddress::new(0, 1)), None);
    assert!(sheets[1].column_widths().is_empty());
}

#[test]
fn test_handler_error_stops_build() {
    // Every cell falls back to the workbook default, which cannot be resolved
    let mut workbook = Workbook::new().with_default_font(FontDescriptor::new("Missing", 11.0));
    workbook.add_sheet(SheetSpec::new(
        "broken",
        grid(&[&[Some("a")]]),
        AutoFitHandler::new(engine("/initial/"), "/fonts"),
    ));
    workbook.add_sheet(SheetSpec::plain("never", Grid::new()));

    match workbook.build() {
        Err(LayoutError::Measurement { column, .. }) => assert_eq!(column, "A"),
        other => panic!("unexpected result: {other:?}"),
    }
}
