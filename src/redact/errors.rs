//! Redaction engine error types
//!
//! Error codes:
//! - RFR_REDACT_ALLOCATION_FAILED (FATAL)
//! - RFR_REDACT_LIST (FATAL)
//! - RFR_REDACT_STORE (FATAL)
//!
//! List and store failures met during the sweep are wrapped with the spot
//! being processed.

use std::fmt;

use crate::spotlist::{SpotId, SpotListError};
use crate::store::StoreError;

/// Severity levels for redaction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The sweep stops before the current spot is written
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Redaction error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactErrorCode {
    /// Scratch buffer could not grow
    RfrRedactAllocationFailed,
    /// Redaction list rejected an entry
    RfrRedactList,
    /// Source or destination access failed
    RfrRedactStore,
}

impl RedactErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RedactErrorCode::RfrRedactAllocationFailed => "RFR_REDACT_ALLOCATION_FAILED",
            RedactErrorCode::RfrRedactList => "RFR_REDACT_LIST",
            RedactErrorCode::RfrRedactStore => "RFR_REDACT_STORE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for RedactErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
enum Cause {
    List(SpotListError),
    Store(StoreError),
}

/// Redaction error with the spot being processed
#[derive(Debug)]
pub struct RedactError {
    code: RedactErrorCode,
    message: String,
    spot: Option<SpotId>,
    cause: Option<Cause>,
}

impl RedactError {
    fn new(code: RedactErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            spot: None,
            cause: None,
        }
    }

    /// Scratch buffer growth failed
    pub fn allocation_failed(requested: usize) -> Self {
        Self::new(
            RedactErrorCode::RfrRedactAllocationFailed,
            format!("cannot allocate {} bytes for scratch buffer", requested),
        )
    }

    /// Attaches the spot being processed
    pub fn at_spot(mut self, spot: SpotId) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Returns the error code
    pub fn code(&self) -> RedactErrorCode {
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

    /// Spot being processed when the error occurred
    pub fn spot(&self) -> Option<SpotId> {
        self.spot
    }

    /// Underlying list error
    pub fn list_error(&self) -> Option<&SpotListError> {
        match &self.cause {
            Some(Cause::List(e)) => Some(e),
            _ => None,
        }
    }

    /// Underlying store error
    pub fn store_error(&self) -> Option<&StoreError> {
        match &self.cause {
            Some(Cause::Store(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<SpotListError> for RedactError {
    fn from(err: SpotListError) -> Self {
        Self {
            cause: Some(Cause::List(err)),
            ..Self::new(RedactErrorCode::RfrRedactList, "redaction list rejected")
        }
    }
}

impl From<StoreError> for RedactError {
    fn from(err: StoreError) -> Self {
        Self {
            cause: Some(Cause::Store(err)),
            ..Self::new(RedactErrorCode::RfrRedactStore, "store access failed")
        }
    }
}

impl fmt::Display for RedactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(spot) = self.spot {
            write!(f, " (spot: {})", spot)?;
        }
        match &self.cause {
            Some(Cause::List(e)) => write!(f, ": {}", e),
            Some(Cause::Store(e)) => write!(f, ": {}", e),
            None => Ok(()),
        }
    }
}

impl std::error::Error for RedactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Some(Cause::List(e)) => Some(e),
            Some(Cause::Store(e)) => Some(e),
            None => None,
        }
    }
}

/// Result type for redaction operations
pub type RedactResult<T> = Result<T, RedactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RedactErrorCode::RfrRedactAllocationFailed.code(),
            "RFR_REDACT_ALLOCATION_FAILED"
        );
        assert_eq!(RedactErrorCode::RfrRedactStore.code(), "RFR_REDACT_STORE");
    }

    #[test]
    fn test_store_cause_is_kept() {
        let err = RedactError::from(StoreError::column("READ", 4, "row out of range")).at_spot(4);
        assert_eq!(err.code(), RedactErrorCode::RfrRedactStore);
        assert!(err.store_error().is_some());
        assert!(err.list_error().is_none());

        let display = err.to_string();
        assert!(display.contains("spot: 4"));
        assert!(display.contains("RFR_STORE_COLUMN"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = RedactError::from(StoreError::lock("refused"));
        assert!(err.source().is_some());
        assert!(RedactError::allocation_failed(8).source().is_none());
    }
}
