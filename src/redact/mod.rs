//! Read-filter redaction
//!
//! - `RedactMode`: filter-only or full-content rewriting
//! - `BufferRecycler`: reusable replacement buffers
//! - `RedactionEngine`: ascending sweep, per-spot write, fingerprint feed

mod buffers;
mod engine;
mod errors;
mod mode;

pub use buffers::{BufferRecycler, Replacement, ScratchBuffer};
pub use engine::{split_segments, RedactStats, RedactionEngine};
pub use errors::{RedactError, RedactErrorCode, RedactResult, Severity};
pub use mode::{RedactMode, MASK_BASE, MASK_QUALITY, REDACTED_FILTER};
