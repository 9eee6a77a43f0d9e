//! read-filter-redact - redaction of listed spots in a sequencing-read run
//!
//! A sorted list of spot ids is merged against the run's id range in one
//! ascending sweep. Listed spots get their READ_FILTER set to redacted and,
//! in full-content mode, READ and QUALITY masked. Content fingerprints of
//! the sweep are written into an append-only history in the run metadata.

pub mod cli;
pub mod fingerprint;
pub mod history;
pub mod observability;
pub mod pipeline;
pub mod redact;
pub mod spotlist;
pub mod store;
