//! Redaction list reading and merging
//!
//! - `InputDir`: owned directory handle for locating the list
//! - `LineReader`: blank trimming and line terminator handling
//! - `SpotListReader`: strictly ascending, bounded id validation
//! - `SpotIterator`: ascending sweep over the run with a redact decision
//!
//! Any malformed entry is fatal and reported with file, line and text.

mod dir;
mod errors;
mod iterator;
mod line;
mod reader;

/// Spot (record) identifier, 1-based within a run
pub type SpotId = u64;

pub use dir::InputDir;
pub use errors::{Severity, SpotListError, SpotListErrorCode, SpotListResult};
pub use iterator::{SpotDecision, SpotIterator};
pub use line::{Line, LineReader, DEFAULT_MAX_LINE};
pub use reader::{validate_list, ListSummary, SpotListReader};
