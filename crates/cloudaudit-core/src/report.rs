//! Report materialization: findings plus schema into a `ReportTable`.

use chrono::{DateTime, Utc};

use crate::table::{CellValue, Finding, Placeholder, ReportSchema, ReportTable};

/// Timestamp format used for `report_generated_at` and stringified dates.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Materialize findings into a fixed-schema table.
///
/// * Every `Timestamp` cell is stripped to a naive UTC datetime.
/// * Metadata columns (`report_generated_at`, the totals column) are
///   appended after all content columns, on every row.
/// * An empty finding collection produces the schema's documented
///   placeholder: either zero rows under the full header set, or a
///   single informational row.
///
/// The column set is identical whether `findings` is empty or not.
pub fn materialize(
    schema: &ReportSchema,
    findings: Vec<Finding>,
    generated_at: DateTime<Utc>,
    total: usize,
) -> ReportTable {
    let columns = schema.full_columns();
    let generated_at_cell = CellValue::Text(generated_at.format(TIMESTAMP_FORMAT).to_string());

    let mut rows = Vec::new();

    if findings.is_empty() {
        if let Placeholder::InfoRow { column, message } = schema.placeholder {
            let mut cells: Vec<CellValue> = schema
                .columns
                .iter()
                .map(|c| {
                    if *c == column {
                        CellValue::Text(message.to_string())
                    } else {
                        CellValue::Empty
                    }
                })
                .collect();
            cells.push(generated_at_cell.clone());
            cells.push(CellValue::Int(total as i64));
            rows.push(cells);
        }
        // HeadersOnly: zero rows under the full column set.
    } else {
        for finding in findings {
            let mut cells: Vec<CellValue> = finding
                .into_cells()
                .into_iter()
                .map(CellValue::strip_timezone)
                .collect();
            debug_assert_eq!(cells.len(), schema.columns.len());
            cells.push(generated_at_cell.clone());
            cells.push(CellValue::Int(total as i64));
            rows.push(cells);
        }
    }

    ReportTable {
        sheet_name: schema.sheet_name.to_string(),
        columns,
        rows,
    }
}
