//! Audit logging for jail events.
//!
//! Logging is best-effort: write failures must never turn an allowed
//! decision into a crash or hang, so callers swallow the errors
//! returned here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::decision::AccessEvent;

/// One audit log line.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// When the access was checked.
    pub timestamp: DateTime<Utc>,
    /// Process that made the call.
    pub pid: u32,
    /// Intercepted operation name.
    pub operation: String,
    /// Canonical path that was not whitelisted.
    pub path: String,
}

impl AuditEntry {
    pub fn new(event: &AccessEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            pid: event.pid,
            operation: event.operation.clone(),
            path: event.path.clone(),
        }
    }
}

/// Appends audit entries to a log file, one JSON object per line.
///
/// Each entry is a single write on an append-mode file, so concurrent
/// writers do not interleave partial lines.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create the audit log.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write one entry to the log.
    pub fn log(&mut self, entry: &AuditEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Record an event.
    pub fn log_event(&mut self, event: &AccessEvent) -> std::io::Result<()> {
        self.log(&AuditEntry::new(event))
    }
}

/// Echo an event to stderr as `<prefix><operation>("<path>")`.
pub fn echo_event(prefix: &str, event: &AccessEvent) {
    eprintln!("{}{}(\"{}\")", prefix, event.operation, event.path);
}
