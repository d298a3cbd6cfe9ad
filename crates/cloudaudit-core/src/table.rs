//! Tabular report model: cells, findings, schemas.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// One cell of a report row.
///
/// Provider timestamps enter as `Timestamp` (timezone-aware UTC) and are
/// normalized to `Naive` at materialization — the Excel format cannot
/// represent timezone-aware datetimes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Naive(NaiveDateTime),
}

impl CellValue {
    /// Strip timezone information, turning `Timestamp` into `Naive` UTC.
    /// All other variants pass through unchanged.
    pub fn strip_timezone(self) -> CellValue {
        match self {
            CellValue::Timestamp(t) => CellValue::Naive(t.naive_utc()),
            other => other,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One compliance violation or informational row.
///
/// Cells are ordered to match the owning rule's schema content columns;
/// metadata columns are appended later by the materializer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    cells: Vec<CellValue>,
}

impl Finding {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<CellValue> {
        self.cells
    }
}

/// What the report looks like when the finding collection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Full column set, zero rows.
    HeadersOnly,
    /// One informational row with `message` in the named column and
    /// every other content cell empty.
    InfoRow {
        column: &'static str,
        message: &'static str,
    },
}

/// Fixed column layout for one rule's report.
#[derive(Debug, Clone)]
pub struct ReportSchema {
    /// Excel sheet name.
    pub sheet_name: &'static str,

    /// Content columns, in order. Metadata columns are not listed here.
    pub columns: &'static [&'static str],

    /// Name of the rule's totals metadata column.
    pub totals_column: &'static str,

    /// Shape of the empty-result report.
    pub placeholder: Placeholder,
}

impl ReportSchema {
    /// Full column set: content columns, then `report_generated_at`,
    /// then the totals column. Identical for empty and non-empty runs.
    pub fn full_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        columns.push("report_generated_at".to_string());
        columns.push(self.totals_column.to_string());
        columns
    }
}

/// A materialized report: ordered rows under a fixed column set.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    /// Number of content rows (placeholder rows included).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_strip_timezone_converts_utc_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let stripped = CellValue::Timestamp(t).strip_timezone();
        assert_eq!(stripped, CellValue::Naive(t.naive_utc()));
    }

    #[test]
    fn test_strip_timezone_leaves_other_cells_alone() {
        assert_eq!(
            CellValue::Text("x".to_string()).strip_timezone(),
            CellValue::Text("x".to_string())
        );
        assert_eq!(CellValue::Int(7).strip_timezone(), CellValue::Int(7));
        assert_eq!(CellValue::Empty.strip_timezone(), CellValue::Empty);
    }

    #[test]
    fn test_full_columns_appends_metadata_last() {
        let schema = ReportSchema {
            sheet_name: "Sheet",
            columns: &["a", "b"],
            totals_column: "total_rows",
            placeholder: Placeholder::HeadersOnly,
        };
        assert_eq!(
            schema.full_columns(),
            vec!["a", "b", "report_generated_at", "total_rows"]
        );
    }
}
