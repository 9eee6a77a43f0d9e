//! Operating mode and masking constants

use crate::store::{WriteColumns, READ, READ_FILTER};

/// READ_FILTER value marking a redacted segment
pub const REDACTED_FILTER: u8 = 3;
/// Base written over redacted reads
pub const MASK_BASE: u8 = b'N';
/// Quality written over redacted reads
pub const MASK_QUALITY: u8 = 0;

/// Which columns a run rewrites.
///
/// The single switch consulted by the engine (columns read and written),
/// the fingerprint set (whether anything is fed) and the history writer
/// (whether QC and current nodes are written).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactMode {
    /// Only READ_FILTER is rewritten
    FilterOnly,
    /// READ_FILTER, READ and QUALITY are rewritten
    FullContent,
}

impl RedactMode {
    /// Mode for the `--redact` flag
    pub fn from_flag(redact_reads: bool) -> Self {
        if redact_reads {
            RedactMode::FullContent
        } else {
            RedactMode::FilterOnly
        }
    }

    pub fn is_full_content(&self) -> bool {
        matches!(self, RedactMode::FullContent)
    }

    /// Columns opened on the destination
    pub fn write_columns(&self) -> WriteColumns {
        match self {
            RedactMode::FilterOnly => WriteColumns::Filter,
            RedactMode::FullContent => WriteColumns::FilterAndReads,
        }
    }

    /// Value of the `updated` history attribute
    pub fn updated_columns(&self) -> String {
        match self {
            RedactMode::FilterOnly => READ_FILTER.to_string(),
            RedactMode::FullContent => format!("{},{}", READ_FILTER, READ),
        }
    }
}
