//! cloudaudit core
//!
//! The generic compliance-check pipeline shared by every rule:
//! - Enumerate resources through a provider seam (`ComplianceCheck::collect`)
//! - Evaluate each record into zero-or-one `Finding`
//! - Materialize a fixed-schema `ReportTable` (placeholder row/headers when clean)
//! - Export to a single-sheet Excel workbook and write the audit trail
//!
//! Rule-specific enumeration and predicates live in `cloudaudit-rules`;
//! this crate only knows about findings, schemas, and run outcomes.

pub mod audit_log;
pub mod check;
pub mod error;
pub mod export;
pub mod outcome;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod telemetry;

// Re-export key types
pub use audit_log::AuditLog;
pub use check::{CheckOutcome, ComplianceCheck};
pub use error::{AuditError, Result};
pub use export::write_workbook;
pub use outcome::{RunOutcome, EXIT_ERROR};
pub use pipeline::{AuditPipeline, RunReport};
pub use report::materialize;
pub use table::{CellValue, Finding, Placeholder, ReportSchema, ReportTable};
pub use telemetry::init_tracing;
