//! The compliance-check seam between the pipeline and rule modules.

use async_trait::async_trait;

use crate::error::Result;
use crate::table::{Finding, ReportSchema};

/// What one rule's enumerate-and-evaluate pass produced.
///
/// `violations` drives the exit code; `report_total` fills the rule's
/// totals metadata column. The two differ only for rules whose rows
/// are not one-per-violation (S3 inventory, GuardDuty summary).
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub findings: Vec<Finding>,
    pub violations: usize,
    pub report_total: usize,
}

impl CheckOutcome {
    /// Standard rule: every row is one violation.
    pub fn flagged(findings: Vec<Finding>) -> Self {
        let count = findings.len();
        Self {
            findings,
            violations: count,
            report_total: count,
        }
    }

    /// Inventory rule: rows are informational, never violations.
    pub fn informational(findings: Vec<Finding>) -> Self {
        let count = findings.len();
        Self {
            findings,
            violations: 0,
            report_total: count,
        }
    }

    /// Aggregate rule: rows summarize `count` underlying violations.
    pub fn aggregated(findings: Vec<Finding>, count: usize) -> Self {
        Self {
            findings,
            violations: count,
            report_total: count,
        }
    }
}

/// One compliance rule: a resource enumerator plus a fixed predicate,
/// described by a report schema and fixed artifact names.
///
/// `collect` must follow provider pagination to completion, tolerate an
/// empty result set as a valid outcome, and propagate provider failures
/// as errors — a failed enumeration is never an empty finding list.
#[async_trait]
pub trait ComplianceCheck: Send + Sync {
    /// Human-readable rule name for logs and summaries.
    fn name(&self) -> &'static str;

    /// Fixed report schema for this rule.
    fn schema(&self) -> &ReportSchema;

    /// Fixed report filename in the working directory.
    fn report_filename(&self) -> &'static str;

    /// Fixed audit-log filename in the working directory.
    fn log_filename(&self) -> &'static str;

    /// Enumerate resources and evaluate the rule against each.
    async fn collect(&self) -> Result<CheckOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, Finding};

    fn row(name: &str) -> Finding {
        Finding::new(vec![CellValue::Text(name.to_string())])
    }

    #[test]
    fn test_flagged_counts_rows_as_violations() {
        let outcome = CheckOutcome::flagged(vec![row("a"), row("b")]);
        assert_eq!(outcome.violations, 2);
        assert_eq!(outcome.report_total, 2);
    }

    #[test]
    fn test_informational_never_violates() {
        let outcome = CheckOutcome::informational(vec![row("bucket")]);
        assert_eq!(outcome.violations, 0);
        assert_eq!(outcome.report_total, 1);
    }

    #[test]
    fn test_aggregated_uses_supplied_count() {
        let outcome = CheckOutcome::aggregated(vec![row("Low"), row("High")], 9);
        assert_eq!(outcome.violations, 9);
        assert_eq!(outcome.report_total, 9);
        assert_eq!(outcome.findings.len(), 2);
    }
}
