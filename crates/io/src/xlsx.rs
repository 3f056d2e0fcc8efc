// Excel export of laid-out worksheets

use std::path::Path;
use std::time::Instant;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet};
use sheetfit_core::{column_index_to_letters, to_range_address, CellAddress};
use sheetfit_engine::{FontDescriptor, Worksheet, WorksheetModel, PIXELS_PER_MILLIMETER};

/// Widest column Excel accepts, in character units
const MAX_EXCEL_WIDTH: f64 = 255.0;

/// Result of an Excel export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of sheets exported
    pub sheets_exported: usize,
    /// Total non-empty cells exported
    pub cells_exported: usize,
    /// Cells written with the wrap-text flag
    pub wrapped_cells: usize,
    /// Columns given an explicit width
    pub columns_sized: usize,
    /// Export duration in milliseconds
    pub export_duration_ms: u128,
    /// Warnings generated during export
    pub warnings: Vec<String>,
}

impl ExportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} sheet{}", self.sheets_exported, if self.sheets_exported == 1 { "" } else { "s" }),
            format!("{} cells", self.cells_exported),
        ];
        if self.columns_sized > 0 {
            parts.push(format!("{} column widths", self.columns_sized));
        }
        parts.join(", ")
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns a single-line warning for status output
    pub fn warning_summary(&self) -> Option<String> {
        if self.warnings.is_empty() {
            None
        } else {
            Some(self.warnings.join(", "))
        }
    }
}

/// Convert a width in millimeters to Excel column width (approximate)
/// Excel measures column width in characters of the default font
fn millimeters_to_excel_width(mm: f64) -> f64 {
    mm * PIXELS_PER_MILLIMETER / 7.0 // ~7 pixels per character
}

/// Row index as rust_xlsxwriter takes it, refusing indices that do not fit
fn excel_row(row: usize) -> Result<u32, String> {
    u32::try_from(row).map_err(|_| format!("Row {} is out of range", row as u128 + 1))
}

/// Column index as rust_xlsxwriter takes it, refusing indices that do not fit
fn excel_col(col: usize) -> Result<u16, String> {
    u16::try_from(col).map_err(|_| format!("Column {} is out of range", column_index_to_letters(col)))
}

/// Export built worksheets to XLSX format
///
/// # Returns
/// * `Ok(ExportResult)` - Export statistics
/// * `Err(String)` - Error message if export failed
pub fn export(worksheets: &[Worksheet], path: &Path) -> Result<ExportResult, String> {
    let start_time = Instant::now();
    let mut result = ExportResult::default();

    let mut xlsx_workbook = XlsxWorkbook::new();

    for sheet in worksheets {
        let worksheet = xlsx_workbook
            .add_worksheet()
            .set_name(sheet.title())
            .map_err(|e| format!("Failed to create sheet '{}': {}", sheet.title(), e))?;

        let (cells, wrapped) = export_sheet_cells(sheet, worksheet)?;
        result.cells_exported += cells;
        result.wrapped_cells += wrapped;

        result.columns_sized += apply_column_widths(sheet, worksheet, &mut result.warnings)?;

        if let Some(selection) = sheet.selection() {
            worksheet
                .set_selection(
                    excel_row(selection.row_min)?,
                    excel_col(selection.col_min)?,
                    excel_row(selection.row_max)?,
                    excel_col(selection.col_max)?,
                )
                .map_err(|e| format!("Failed to select {}: {}", to_range_address(&selection), e))?;
        }

        result.sheets_exported += 1;
    }

    // Save to file
    xlsx_workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    result.export_duration_ms = start_time.elapsed().as_millis();
    log::info!("Exported {} to {}", result.summary(), path.display());
    Ok(result)
}

/// Write every non-empty cell with its font and wrap flag.
///
/// Returns (cells_exported, wrapped_cells).
fn export_sheet_cells(sheet: &Worksheet, worksheet: &mut XlsxWorksheet) -> Result<(usize, usize), String> {
    let mut cells_exported = 0;
    let mut wrapped_cells = 0;

    for (row, values) in sheet.grid().rows().iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            let Some(value) = value.as_deref() else {
                continue;
            };
            let cell = CellAddress::new(row, col);
            let wrap = sheet.is_wrapped(cell);
            let format = build_excel_format(&sheet.cell_font(cell), wrap);

            worksheet
                .write_string_with_format(excel_row(row)?, excel_col(col)?, value, &format)
                .map_err(|e| format!("Failed to write cell {}: {}", cell, e))?;

            cells_exported += 1;
            if wrap {
                wrapped_cells += 1;
            }
        }
    }

    Ok((cells_exported, wrapped_cells))
}

fn build_excel_format(font: &FontDescriptor, wrap: bool) -> Format {
    let mut format = Format::new()
        .set_font_name(font.family.as_str())
        .set_font_size(font.size);

    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }

    if wrap {
        format = format.set_text_wrap();
    }

    format
}

/// Apply fitted column widths. Widths past Excel's limit are capped with a warning.
fn apply_column_widths(
    sheet: &Worksheet,
    worksheet: &mut XlsxWorksheet,
    warnings: &mut Vec<String>,
) -> Result<usize, String> {
    for (&col, &width_mm) in sheet.column_widths() {
        let mut excel_width = millimeters_to_excel_width(width_mm);
        if excel_width > MAX_EXCEL_WIDTH {
            warnings.push(format!(
                "{}: column {} capped at {} characters",
                sheet.title(),
                column_index_to_letters(col),
                MAX_EXCEL_WIDTH
            ));
            excel_width = MAX_EXCEL_WIDTH;
        }
        worksheet
            .set_column_width(excel_col(col)?, excel_width)
            .map_err(|e| format!("Failed to set column {} width: {}", col, e))?;
    }
    Ok(sheet.column_widths().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetfit_core::{Grid, Rectangle};

    fn sheet(title: &str, rows: &[&[Option<&str>]]) -> Worksheet {
        Worksheet::from_grid(title, Grid::from_rows(rows.iter().map(|r| r.iter().copied())))
    }

    #[test]
    fn test_millimeters_to_excel_width() {
        // 7 pixels per character at 96 DPI
        let one_char_mm = 7.0 / PIXELS_PER_MILLIMETER;
        assert!((millimeters_to_excel_width(one_char_mm) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_index_conversion_refuses_truncation() {
        assert_eq!(excel_col(16383), Ok(16383));
        assert_eq!(excel_row(1_048_575), Ok(1_048_575));
        assert!(excel_col(65536).unwrap_err().contains("CRXQ"));
        #[cfg(target_pointer_width = "64")]
        assert!(excel_row(1 << 32).is_err());
    }

    #[test]
    fn test_export_rejects_column_past_u16() {
        let mut ws = sheet("Wide", &[]);
        ws.set_cell_value(CellAddress::new(0, 65536), Some("far".into()));

        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("wide.xlsx");

        let err = export(&[ws], &export_path).unwrap_err();
        assert!(err.contains("out of range"), "{err}");
        assert!(!export_path.exists());
    }

    #[test]
    fn test_export_result_summary() {
        let result = ExportResult {
            sheets_exported: 1,
            cells_exported: 4,
            columns_sized: 2,
            ..ExportResult::default()
        };
        assert_eq!(result.summary(), "1 sheet, 4 cells, 2 column widths");
        assert!(!result.has_warnings());
        assert_eq!(result.warning_summary(), None);
    }

    #[test]
    fn test_export_basic() {
        let ws = sheet("Data", &[&[Some("Hello"), None], &[None, Some("World")]]);

        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("test_export.xlsx");

        let result = export(&[ws], &export_path).unwrap();

        assert_eq!(result.sheets_exported, 1);
        assert_eq!(result.cells_exported, 2);
        assert_eq!(result.wrapped_cells, 0);
        assert!(export_path.exists());

        // XLSX is a ZIP, should have meaningful size
        let metadata = std::fs::metadata(&export_path).unwrap();
        assert!(metadata.len() > 100);
    }

    #[test]
    fn test_export_with_layout() {
        let mut ws = sheet("Layout", &[&[Some("a\nb"), Some("c")]]);
        ws.set_range_wrap(&Rectangle::new(0, 0, 0, 1), true).unwrap();
        ws.set_column_width(0, 20.0).unwrap();
        ws.set_column_width(1, 5000.0).unwrap();
        ws.set_cell_font(CellAddress::new(0, 1), FontDescriptor::new("Arial", 14.0).bold().italic());
        ws.set_selection(Rectangle::single(CellAddress::new(0, 0)));

        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("test_layout.xlsx");

        let result = export(&[ws], &export_path).unwrap();
        assert_eq!(result.wrapped_cells, 2);
        assert_eq!(result.columns_sized, 2);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warning_summary().unwrap().contains("column B"));
    }

    #[test]
    fn test_export_multiple_sheets() {
        let first = sheet("One", &[&[Some("Sheet1 Data")]]);
        let second = sheet("Two", &[&[Some("Sheet2 Data")]]);

        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("test_multi.xlsx");

        let result = export(&[first, second], &export_path).unwrap();
        assert_eq!(result.sheets_exported, 2);
        assert_eq!(result.cells_exported, 2);
    }

    #[test]
    fn test_export_rejects_invalid_sheet_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("bad.xlsx");

        let err = export(&[sheet("Bad[1]", &[&[Some("x")]])], &export_path).unwrap_err();
        assert!(err.contains("Bad[1]"), "{err}");
        assert!(!export_path.exists());
    }
}
