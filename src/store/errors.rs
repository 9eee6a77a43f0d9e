//! Store error types
//!
//! Error codes:
//! - RFR_STORE_NOT_FOUND (FATAL)
//! - RFR_STORE_OPEN_FAILED (FATAL)
//! - RFR_STORE_COLUMN (FATAL)
//! - RFR_STORE_WRITE_FAILED (FATAL)
//! - RFR_STORE_LOCK (FATAL)
//! - RFR_STORE_FORMAT (FATAL)

use std::fmt;
use std::io;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Run or table does not exist
    RfrStoreNotFound,
    /// Run exists but could not be opened
    RfrStoreOpenFailed,
    /// Column or row access failed
    RfrStoreColumn,
    /// Row write or commit failed
    RfrStoreWriteFailed,
    /// Lock or unlock failed
    RfrStoreLock,
    /// Run document could not be parsed or serialized
    RfrStoreFormat,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::RfrStoreNotFound => "RFR_STORE_NOT_FOUND",
            StoreErrorCode::RfrStoreOpenFailed => "RFR_STORE_OPEN_FAILED",
            StoreErrorCode::RfrStoreColumn => "RFR_STORE_COLUMN",
            StoreErrorCode::RfrStoreWriteFailed => "RFR_STORE_WRITE_FAILED",
            StoreErrorCode::RfrStoreLock => "RFR_STORE_LOCK",
            StoreErrorCode::RfrStoreFormat => "RFR_STORE_FORMAT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with operation context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Run or table is missing
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::RfrStoreNotFound, format!("Cannot find '{}'", what.into()))
    }

    /// Opening the run failed
    pub fn open_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StoreErrorCode::RfrStoreOpenFailed, message)
        }
    }

    /// Reading a column cell failed
    pub fn column(column: &str, row: u64, reason: impl Into<String>) -> Self {
        Self::new(
            StoreErrorCode::RfrStoreColumn,
            format!("while reading {}: {}", column, reason.into()),
        )
        .with_details(format!("row: {}", row))
    }

    /// Writing or committing failed
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::RfrStoreWriteFailed, message)
    }

    /// Writing failed with an IO source
    pub fn write_failed_io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StoreErrorCode::RfrStoreWriteFailed, message)
        }
    }

    /// Lock state could not be changed
    pub fn lock(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::RfrStoreLock, message)
    }

    /// Run document is malformed
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::RfrStoreFormat, message)
    }

    /// Add details to an error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
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

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
