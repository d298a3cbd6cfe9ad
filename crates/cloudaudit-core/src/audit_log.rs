//! Per-run audit trail: file sink plus console mirror.
//!
//! Each rule writes its evidence to a fixed log file in the working
//! directory (`timestamp - LEVEL - message` per line) and mirrors the
//! same line to the console through `tracing`. The sink is injected
//! into the pipeline rather than configured as process-global state,
//! so pipelines stay composable and testable in isolation.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::report::TIMESTAMP_FORMAT;

/// Append-or-create audit log sink.
pub struct AuditLog {
    file: Mutex<File>,
}

impl AuditLog {
    /// Open (or create) the audit log at `path` in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub fn info(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!("{message}");
        self.append("INFO", message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        warn!("{message}");
        self.append("WARNING", message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        error!("{message}");
        self.append("ERROR", message);
    }

    /// Write one `timestamp - LEVEL - message` line. A failed write is
    /// deliberately ignored: the audit trail must never abort the run
    /// it is documenting.
    fn append(&self, level: &str, message: &str) {
        let line = format!(
            "{} - {} - {}",
            Utc::now().format(TIMESTAMP_FORMAT),
            level,
            message
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}
