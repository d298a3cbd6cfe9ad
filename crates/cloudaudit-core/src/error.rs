//! Error types for audit pipeline operations.

use thiserror::Error;

/// Errors that can surface during an audit run.
///
/// A provider failure is always distinguishable from an empty result
/// set: enumeration that yields nothing returns `Ok(vec![])`, never an
/// error, and a failed provider call never degrades into one.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A provider API call failed (auth, network, throttling).
    #[error("Provider call failed: {context}: {message}")]
    Provider { context: String, message: String },

    /// Writing the Excel report failed.
    #[error("Report export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// Filesystem error (log file, report path).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Build a provider error from a call context (e.g. `iam:ListUsers`)
    /// and the underlying error's display form.
    pub fn provider(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AuditError::Provider {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for audit pipeline operations.
pub type Result<T> = std::result::Result<T, AuditError>;
