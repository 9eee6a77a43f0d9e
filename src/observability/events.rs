//! Observable events of a redaction run
//!
//! Events are explicit and typed. Every event has a stable upper-case name
//! and a fixed severity, so log consumers can match on the name alone.

use std::fmt;

use super::logger::Severity;

/// Observable events during a redaction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Run is starting
    RedactStart,
    /// Run finished successfully
    RedactComplete,
    /// Run aborted with a fatal error
    RedactFailed,
    /// Cancellation was observed at a record boundary
    RunCancelled,

    // Configuration
    /// Settings file loaded
    ConfigLoaded,
    /// Redaction list validated without touching the run
    ListChecked,

    // Store
    /// Store was locked and has been unlocked for the run
    StoreUnlocked,
    /// Store lock restored at teardown
    StoreRelocked,
    /// Run document written back
    RunSaved,

    // Sweep
    /// A spot is being redacted
    SpotRedacted,
    /// Read and quality arrays have different lengths
    LengthMismatch,
    /// Segment lengths add up to more than the read length
    SegmentOverflow,

    // History
    /// Event appended to an indexed log
    HistoryAppended,
    /// Child at the starting index is missing
    HistoryIndexGap,
    /// Insertion point already taken, probing forward
    HistoryIndexProbe,
    /// Current fingerprint snapshot overwritten
    CurrentUpdated,
    /// Latest QC event checked against the current snapshot
    AuditChecked,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RedactStart => "REDACT_START",
            Event::RedactComplete => "REDACT_COMPLETE",
            Event::RedactFailed => "REDACT_FAILED",
            Event::RunCancelled => "RUN_CANCELLED",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ListChecked => "LIST_CHECKED",

            Event::StoreUnlocked => "STORE_UNLOCKED",
            Event::StoreRelocked => "STORE_RELOCKED",
            Event::RunSaved => "RUN_SAVED",

            Event::SpotRedacted => "SPOT_REDACTED",
            Event::LengthMismatch => "LENGTH_MISMATCH",
            Event::SegmentOverflow => "SEGMENT_OVERFLOW",

            Event::HistoryAppended => "HISTORY_APPENDED",
            Event::HistoryIndexGap => "HISTORY_INDEX_GAP",
            Event::HistoryIndexProbe => "HISTORY_INDEX_PROBE",
            Event::CurrentUpdated => "CURRENT_UPDATED",
            Event::AuditChecked => "AUDIT_CHECKED",
        }
    }

    /// Severity the event is emitted at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SpotRedacted => Severity::Debug,

            Event::LengthMismatch
            | Event::SegmentOverflow
            | Event::RunCancelled
            | Event::HistoryIndexProbe => Severity::Warn,

            Event::RedactFailed | Event::HistoryIndexGap => Severity::Error,

            _ => Severity::Info,
        }
    }

    /// Returns true if this event ends the run abnormally
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::RedactFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
