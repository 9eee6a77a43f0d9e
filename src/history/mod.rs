//! History Versioning Writer
//!
//! Per the audit contract:
//! - Every run appends one `HISTORY/EVENT_<n>` event
//! - Full-content runs also append one `QC/history/event_<n>` event
//!   and overwrite `QC/current` with the output fingerprint
//! - Appended events are sealed and never rewritten
//!
//! The QC event is appended before `QC/current` is replaced, so its
//! `original` child always holds the snapshot the run started from.

mod current;
mod errors;
mod events;
mod log;

pub use current::{read_fingerprint, update_current, write_fingerprint, CURRENT};
pub use errors::{HistoryError, HistoryErrorCode, HistoryResult, Severity};
pub use events::{write_qc_event, write_run_event, ToolIdentity, REASON};
pub use log::{compute_seal, format_seal, EventState, IndexedLog, SEAL};

use chrono::Utc;

use crate::fingerprint::{verify_redaction, AuditReport, FingerprintSet};
use crate::observability::{log_event_with_fields, Event};
use crate::redact::RedactMode;
use crate::store::MetaNode;

/// Indexes of the events written by one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRecord {
    pub event: u32,
    pub qc_event: Option<u32>,
}

/// Writes the history of a finished sweep
#[derive(Debug, Clone)]
pub struct HistoryWriter {
    tool: ToolIdentity,
    timestamp: Option<String>,
}

impl HistoryWriter {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool: ToolIdentity::current(tool_name),
            timestamp: None,
        }
    }

    /// Pins the timestamp instead of reading the clock
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn tool(&self) -> &ToolIdentity {
        &self.tool
    }

    fn timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339())
    }

    /// Appends the events of one run and, in full-content mode, replaces the
    /// current snapshot.
    pub fn record_run(
        &self,
        meta: &mut MetaNode,
        mode: RedactMode,
        fingerprints: &FingerprintSet,
    ) -> HistoryResult<HistoryRecord> {
        let timestamp = self.timestamp();

        let event = IndexedLog::history().append(meta, |node| {
            write_run_event(node, &self.tool, mode, &timestamp);
            Ok(())
        })?;

        if !mode.is_full_content() {
            return Ok(HistoryRecord {
                event,
                qc_event: None,
            });
        }

        let previous = meta.open(CURRENT).cloned();
        let qc_event = IndexedLog::qc_history().append(meta, |node| {
            write_qc_event(node, previous.as_ref(), fingerprints, &timestamp)
        })?;

        update_current(meta, fingerprints.output(), &timestamp)?;

        Ok(HistoryRecord {
            event,
            qc_event: Some(qc_event),
        })
    }
}

/// Checks `original + added - removed == current` for the latest QC event
pub fn audit_latest_redaction(meta: &MetaNode) -> HistoryResult<AuditReport> {
    let log = IndexedLog::qc_history();
    let index = log
        .latest(meta)
        .ok_or_else(|| HistoryError::missing_node(log.parent()))?;

    let path = log.event_path(index);
    if log.inspect(meta, index) != EventState::Sealed {
        return Err(HistoryError::partial_event(path));
    }

    let event = meta
        .open(&path)
        .ok_or_else(|| HistoryError::missing_node(path.as_str()))?;
    let fingerprint_at = |name: &str| {
        let child_path = format!("{}/{}", path, name);
        let node = event
            .child(name)
            .ok_or_else(|| HistoryError::missing_node(child_path.as_str()))?;
        read_fingerprint(node, &child_path)
    };

    let original = fingerprint_at("original")?;
    let removed = fingerprint_at("removed")?;
    let added = fingerprint_at("added")?;

    let current_node = meta
        .open(CURRENT)
        .ok_or_else(|| HistoryError::missing_node(CURRENT))?;
    let current = read_fingerprint(current_node, CURRENT)?;

    let report = verify_redaction(&original, &removed, &added, &current);

    log_event_with_fields(
        Event::AuditChecked,
        &[
            ("event", path),
            ("consistent", report.is_consistent().to_string()),
        ],
    );

    Ok(report)
}
