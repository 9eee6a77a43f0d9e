//! Store interfaces for read-filter redaction
//!
//! - `SourceTable` / `DestinationTable`: per-spot column access
//! - `MetaNode`: hierarchical metadata tree holding history and QC nodes
//! - `Lockable` / `WriteAccess`: unlock for the run, always re-lock
//! - `MemoryTable`, `StagedWriter`, `RunArchive`: in-memory reference store

mod archive;
mod errors;
mod lock;
mod metadata;
mod table;

pub use archive::RunArchive;
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use lock::{Lockable, WriteAccess};
pub use metadata::MetaNode;
pub use table::{
    DestinationTable, IdRange, MemoryTable, ReadPayload, RowWrite, SourceTable, SpotRow,
    StagedRow, StagedWriter, WriteColumns, QUALITY, READ, READ_FILTER, READ_LEN,
};
