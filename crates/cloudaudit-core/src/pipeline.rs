//! Audit pipeline orchestration.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use crate::audit_log::AuditLog;
use crate::check::ComplianceCheck;
use crate::error::Result;
use crate::export::write_workbook;
use crate::outcome::RunOutcome;
use crate::report::materialize;

/// Result of one complete audit run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Rule name.
    pub check_name: String,

    /// Content rows written to the report (placeholder rows included).
    pub row_count: usize,

    /// Violations found (drives the exit code).
    pub violations: usize,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// Where the report was written.
    pub report_path: PathBuf,

    /// Derived outcome.
    pub outcome: RunOutcome,
}

/// Generic compliance pipeline: enumerate, evaluate, materialize, report.
pub struct AuditPipeline;

impl AuditPipeline {
    /// Run one rule end to end.
    ///
    /// Collection completes before any file is written, so a failure
    /// mid-enumeration propagates without touching an existing report.
    /// Provider and export failures surface as errors for the caller
    /// to map to exit code 1; they are logged first.
    pub async fn run(
        check: &dyn ComplianceCheck,
        log: &AuditLog,
        report_path: &Path,
    ) -> Result<RunReport> {
        let start = Instant::now();
        log.info(format!("=== Starting {} check ===", check.name()));

        let collected = match check.collect().await {
            Ok(collected) => collected,
            Err(e) => {
                log.error(format!("{} check failed: {e}", check.name()));
                return Err(e);
            }
        };

        let table = materialize(
            check.schema(),
            collected.findings,
            Utc::now(),
            collected.report_total,
        );

        if table.rows.is_empty() {
            log.info("No findings - report will contain headers only");
        }

        if let Err(e) = write_workbook(&table, report_path) {
            log.error(format!("Failed to write report: {e}"));
            return Err(e);
        }
        log.info(format!("Excel report saved: {}", report_path.display()));

        let outcome = RunOutcome::from_violations(collected.violations);
        match outcome {
            RunOutcome::Compliant => {
                log.info(format!("{}: no violations found", check.name()));
            }
            RunOutcome::ViolationsFound { count } => {
                log.warn(format!("{}: {count} violation(s) found", check.name()));
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        log.info(format!(
            "Completed in {:.2} seconds",
            duration_ms as f64 / 1000.0
        ));
        log.info(format!("=== {} check complete ===", check.name()));

        Ok(RunReport {
            check_name: check.name().to_string(),
            row_count: table.row_count(),
            violations: collected.violations,
            duration_ms,
            report_path: report_path.to_path_buf(),
            outcome,
        })
    }
}
