//! Excel workbook writer for materialized report tables.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::report::TIMESTAMP_FORMAT;
use crate::table::{CellValue, ReportTable};

/// Write a report table to a single-sheet `.xlsx` workbook.
///
/// Row 0 carries the column headers in bold; content rows follow in
/// order. Naive datetimes are serialized in `%Y-%m-%d %H:%M:%S` form.
pub fn write_workbook(table: &ReportTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&table.sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
                CellValue::Int(v) => {
                    worksheet.write_number(row_num, col_num, *v as f64)?;
                }
                CellValue::Float(v) => {
                    worksheet.write_number(row_num, col_num, *v)?;
                }
                CellValue::Naive(t) => {
                    let formatted = t.format(TIMESTAMP_FORMAT).to_string();
                    worksheet.write_string(row_num, col_num, &formatted)?;
                }
                // Materialization strips these; if one slips through,
                // serialize as naive UTC.
                CellValue::Timestamp(t) => {
                    let formatted = t.naive_utc().format(TIMESTAMP_FORMAT).to_string();
                    worksheet.write_string(row_num, col_num, &formatted)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
