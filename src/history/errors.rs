//! History error types
//!
//! Error codes:
//! - RFR_HISTORY_CORRUPT (FATAL)
//! - RFR_HISTORY_MISSING_NODE (ERROR)
//! - RFR_HISTORY_PARTIAL_EVENT (ERROR)
//! - RFR_HISTORY_FORMAT (ERROR)

use std::fmt;

/// Severity levels for history errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Audit read failed, the run itself is unaffected
    Error,
    /// No valid insertion point, the run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// History error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryErrorCode {
    /// Indexed log has no free slot within the probing bound
    RfrHistoryCorrupt,
    /// Expected metadata node is absent
    RfrHistoryMissingNode,
    /// Event was not sealed or its seal does not match
    RfrHistoryPartialEvent,
    /// Stored value could not be parsed or serialized
    RfrHistoryFormat,
}

impl HistoryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            HistoryErrorCode::RfrHistoryCorrupt => "RFR_HISTORY_CORRUPT",
            HistoryErrorCode::RfrHistoryMissingNode => "RFR_HISTORY_MISSING_NODE",
            HistoryErrorCode::RfrHistoryPartialEvent => "RFR_HISTORY_PARTIAL_EVENT",
            HistoryErrorCode::RfrHistoryFormat => "RFR_HISTORY_FORMAT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            HistoryErrorCode::RfrHistoryCorrupt => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for HistoryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// History error with the metadata path involved
#[derive(Debug)]
pub struct HistoryError {
    code: HistoryErrorCode,
    message: String,
    path: Option<String>,
}

impl HistoryError {
    fn new(code: HistoryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// No free index found under `parent`
    pub fn corrupt(parent: &str, probed_to: u32) -> Self {
        Self::new(
            HistoryErrorCode::RfrHistoryCorrupt,
            format!("cannot find next event node, probed up to index {}", probed_to),
        )
        .with_path(parent)
    }

    /// Node at `path` is absent
    pub fn missing_node(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            HistoryErrorCode::RfrHistoryMissingNode,
            format!("metadata node '{}' not found", path),
        )
        .with_path(path)
    }

    /// Event at `path` is not sealed
    pub fn partial_event(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            HistoryErrorCode::RfrHistoryPartialEvent,
            format!("event '{}' is incomplete", path),
        )
        .with_path(path)
    }

    /// Stored value is malformed
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(HistoryErrorCode::RfrHistoryFormat, message)
    }

    /// Fingerprint could not be serialized
    pub fn serialization(err: &serde_json::Error) -> Self {
        Self::format(format!("cannot serialize fingerprint: {}", err))
    }

    /// Attaches the metadata path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> HistoryErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Metadata path involved
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref path) = self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for HistoryError {}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
