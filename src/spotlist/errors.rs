//! Spot list error types
//!
//! Every rejection of a list line carries the file path, the line number and
//! the raw line text.
//!
//! Error codes:
//! - RFR_LIST_NOT_FOUND (FATAL)
//! - RFR_LIST_IO (FATAL)
//! - RFR_LIST_LINE_TOO_LONG (FATAL)
//! - RFR_LIST_BAD_SYMBOL (FATAL)
//! - RFR_LIST_BAD_CHARACTER (FATAL)
//! - RFR_LIST_ZERO_ID (FATAL)
//! - RFR_LIST_DUPLICATE (FATAL)
//! - RFR_LIST_UNSORTED (FATAL)
//! - RFR_LIST_OUT_OF_RANGE (FATAL)
//! - RFR_LIST_UNCONSUMED_ENTRY (FATAL)

use std::fmt;
use std::io;

/// Severity levels for spot list errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run must abort before any further record is processed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Spot list error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotListErrorCode {
    /// List file does not exist
    RfrListNotFound,
    /// Reading the list failed
    RfrListIo,
    /// Line does not fit into the line buffer
    RfrListLineTooLong,
    /// Non-blank character after trailing blanks
    RfrListBadSymbol,
    /// Non-digit character inside a line
    RfrListBadCharacter,
    /// Spot id 0
    RfrListZeroId,
    /// Same id as the previous entry
    RfrListDuplicate,
    /// Id smaller than the previous entry
    RfrListUnsorted,
    /// Id bigger than the last spot of the run
    RfrListOutOfRange,
    /// An entry was still pending when the sweep ended
    RfrListUnconsumedEntry,
}

impl SpotListErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SpotListErrorCode::RfrListNotFound => "RFR_LIST_NOT_FOUND",
            SpotListErrorCode::RfrListIo => "RFR_LIST_IO",
            SpotListErrorCode::RfrListLineTooLong => "RFR_LIST_LINE_TOO_LONG",
            SpotListErrorCode::RfrListBadSymbol => "RFR_LIST_BAD_SYMBOL",
            SpotListErrorCode::RfrListBadCharacter => "RFR_LIST_BAD_CHARACTER",
            SpotListErrorCode::RfrListZeroId => "RFR_LIST_ZERO_ID",
            SpotListErrorCode::RfrListDuplicate => "RFR_LIST_DUPLICATE",
            SpotListErrorCode::RfrListUnsorted => "RFR_LIST_UNSORTED",
            SpotListErrorCode::RfrListOutOfRange => "RFR_LIST_OUT_OF_RANGE",
            SpotListErrorCode::RfrListUnconsumedEntry => "RFR_LIST_UNCONSUMED_ENTRY",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SpotListErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Spot list error with file and line context
#[derive(Debug)]
pub struct SpotListError {
    code: SpotListErrorCode,
    message: String,
    path: Option<String>,
    line_number: Option<u64>,
    line_text: Option<String>,
    source: Option<io::Error>,
}

impl SpotListError {
    fn new(code: SpotListErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            line_number: None,
            line_text: None,
            source: None,
        }
    }

    fn at_line(mut self, number: u64, text: &str) -> Self {
        self.line_number = Some(number);
        self.line_text = Some(text.to_string());
        self
    }

    /// List file is missing
    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(SpotListErrorCode::RfrListNotFound, format!("Cannot find '{}'", path))
            .with_path(path)
    }

    /// IO failure while opening or reading the list
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(SpotListErrorCode::RfrListIo, message)
        }
    }

    /// Line exceeds the line buffer
    pub fn line_too_long(number: u64, text: &str, max: usize) -> Self {
        Self::new(
            SpotListErrorCode::RfrListLineTooLong,
            format!("line longer than {} characters", max),
        )
        .at_line(number, text)
    }

    /// Non-blank character after trailing blanks
    pub fn bad_symbol(number: u64, text: &str, symbol: char) -> Self {
        Self::new(
            SpotListErrorCode::RfrListBadSymbol,
            format!("bad symbol '{}'", symbol.escape_default()),
        )
        .at_line(number, text)
    }

    /// Non-digit character inside the line
    pub fn bad_character(number: u64, text: &str, ch: char) -> Self {
        Self::new(
            SpotListErrorCode::RfrListBadCharacter,
            format!("unexpected character '{}'", ch.escape_default()),
        )
        .at_line(number, text)
    }

    /// Spot id 0
    pub fn zero_id(number: u64, text: &str) -> Self {
        Self::new(SpotListErrorCode::RfrListZeroId, "bad spot id '0'").at_line(number, text)
    }

    /// Repeated spot id
    pub fn duplicate(number: u64, text: &str, id: u64) -> Self {
        Self::new(
            SpotListErrorCode::RfrListDuplicate,
            format!("duplicated spot id '{}'", id),
        )
        .at_line(number, text)
    }

    /// Spot id smaller than the previous one
    pub fn unsorted(number: u64, text: &str, id: u64, last: u64) -> Self {
        Self::new(
            SpotListErrorCode::RfrListUnsorted,
            format!("list is unsorted: {} < {}", id, last),
        )
        .at_line(number, text)
    }

    /// Spot id outside the run's spot range
    pub fn out_of_range(number: u64, text: &str, first: u64, max: u64) -> Self {
        let message = if max < first {
            format!("spot id '{}' given but the run has no spots", text)
        } else {
            format!(
                "spot id '{}' is outside the spot range {}..={}",
                text, first, max
            )
        };
        Self::new(SpotListErrorCode::RfrListOutOfRange, message).at_line(number, text)
    }

    /// List entry left after the last spot was traversed
    pub fn unconsumed_entry(id: u64, last_spot: u64) -> Self {
        Self::new(
            SpotListErrorCode::RfrListUnconsumedEntry,
            format!("spot id {} was not reached; last traversed spot is {}", id, last_spot),
        )
    }

    /// Attaches the list path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SpotListErrorCode {
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

    /// Path of the list file, if known
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// 1-based line number of the offending line
    pub fn line_number(&self) -> Option<u64> {
        self.line_number
    }

    /// Raw text of the offending line
    pub fn line_text(&self) -> Option<&str> {
        self.line_text.as_deref()
    }
}

impl fmt::Display for SpotListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;

        let mut context = Vec::new();
        if let Some(ref path) = self.path {
            context.push(format!("file '{}'", path));
        }
        if let Some(number) = self.line_number {
            context.push(format!("line {}", number));
        }
        if let Some(ref text) = self.line_text {
            context.push(format!("'{}'", text));
        }
        if !context.is_empty() {
            write!(f, " ({})", context.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for SpotListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for spot list operations
pub type SpotListResult<T> = Result<T, SpotListError>;
