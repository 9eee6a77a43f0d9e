//! Table interfaces consumed and exposed by the redaction core
//!
//! The columnar engine itself is external. The core reads four columns per
//! spot through [`SourceTable`] and writes one row per spot through
//! [`DestinationTable`]. [`MemoryTable`] and [`StagedWriter`] are the
//! in-memory reference implementations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use crate::spotlist::SpotId;

/// Filter-flag column, one byte per read segment
pub const READ_FILTER: &str = "READ_FILTER";
/// Segment-length column
pub const READ_LEN: &str = "READ_LEN";
/// Base column
pub const READ: &str = "READ";
/// Quality column
pub const QUALITY: &str = "QUALITY";

/// Contiguous row id range of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    /// First row id
    pub first: SpotId,
    /// Number of rows
    pub count: u64,
}

impl IdRange {
    /// Creates a range of `count` rows starting at `first`
    pub fn new(first: SpotId, count: u64) -> Self {
        Self { first, count }
    }

    /// Last row id; `first - 1` for an empty range
    pub fn last(&self) -> SpotId {
        (self.first + self.count).saturating_sub(1)
    }
}

/// Read access to the run table
pub trait SourceTable {
    /// Row id range of the table
    fn id_range(&self) -> StoreResult<IdRange>;

    /// READ_FILTER cell
    fn read_filter(&self, row: SpotId) -> StoreResult<&[u8]>;

    /// READ_LEN cell
    fn read_lengths(&self, row: SpotId) -> StoreResult<&[u32]>;

    /// READ cell
    fn read_bases(&self, row: SpotId) -> StoreResult<&[u8]>;

    /// QUALITY cell
    fn read_quality(&self, row: SpotId) -> StoreResult<&[u8]>;
}

/// Base and quality payload of one output row
#[derive(Debug, Clone, Copy)]
pub struct ReadPayload<'a> {
    pub bases: &'a [u8],
    pub quality: &'a [u8],
}

/// One output row: filter flags always, reads only in full-content mode
#[derive(Debug, Clone, Copy)]
pub struct RowWrite<'a> {
    pub filter: &'a [u8],
    pub payload: Option<ReadPayload<'a>>,
}

/// Write access to the run table.
///
/// `write_row` opens, fills, commits and closes a single row. It either
/// succeeds completely or leaves no trace of that row.
pub trait DestinationTable {
    /// Writes one row
    fn write_row(&mut self, row: SpotId, write: &RowWrite<'_>) -> StoreResult<()>;

    /// Commits the cursor after the last row
    fn commit(&mut self) -> StoreResult<()>;
}

/// Columns a writer is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteColumns {
    /// READ_FILTER only
    Filter,
    /// READ_FILTER, READ and QUALITY
    FilterAndReads,
}

impl WriteColumns {
    /// Returns true if READ and QUALITY are writable
    pub fn includes_reads(&self) -> bool {
        matches!(self, WriteColumns::FilterAndReads)
    }
}

/// One spot of an in-memory table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotRow {
    pub read_filter: Vec<u8>,
    pub read_len: Vec<u32>,
    pub read: String,
    pub quality: Vec<u8>,
}

impl SpotRow {
    /// Builds a row with every segment passing the filter
    pub fn new(read: &str, read_len: Vec<u32>, quality: Vec<u8>) -> Self {
        Self {
            read_filter: vec![0; read_len.len()],
            read_len,
            read: read.to_string(),
            quality,
        }
    }
}

fn default_first_row() -> SpotId {
    1
}

/// In-memory run table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTable {
    #[serde(default = "default_first_row")]
    first_row: SpotId,
    rows: Vec<SpotRow>,
}

impl MemoryTable {
    /// Creates a table whose first row id is 1
    pub fn new(rows: Vec<SpotRow>) -> Self {
        Self { first_row: 1, rows }
    }

    /// Overrides the first row id
    pub fn with_first_row(mut self, first_row: SpotId) -> Self {
        self.first_row = first_row;
        self
    }

    /// All rows in id order
    pub fn rows(&self) -> &[SpotRow] {
        &self.rows
    }

    /// Row by id
    pub fn row(&self, id: SpotId) -> Option<&SpotRow> {
        let index = id.checked_sub(self.first_row)?;
        self.rows.get(usize::try_from(index).ok()?)
    }

    fn row_or_err(&self, column: &str, id: SpotId) -> StoreResult<&SpotRow> {
        self.row(id)
            .ok_or_else(|| StoreError::column(column, id, "row out of range"))
    }

    /// Installs the rows of a committed writer. Returns the number of rows replaced.
    pub fn apply(&mut self, writer: StagedWriter) -> StoreResult<usize> {
        if !writer.committed {
            return Err(StoreError::write_failed("cannot apply an uncommitted writer"));
        }

        let first_row = self.first_row;
        let mut applied = 0;
        for (id, staged) in writer.rows {
            let row = id
                .checked_sub(first_row)
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.rows.get_mut(i))
                .ok_or_else(|| StoreError::write_failed("staged row out of range")
                    .with_details(format!("row: {}", id)))?;

            row.read_filter = staged.read_filter;
            if let Some(read) = staged.read {
                row.read = String::from_utf8(read).map_err(|_| {
                    StoreError::write_failed("READ is not valid UTF-8")
                        .with_details(format!("row: {}", id))
                })?;
            }
            if let Some(quality) = staged.quality {
                row.quality = quality;
            }
            applied += 1;
        }
        Ok(applied)
    }
}

impl SourceTable for MemoryTable {
    fn id_range(&self) -> StoreResult<IdRange> {
        Ok(IdRange::new(self.first_row, self.rows.len() as u64))
    }

    fn read_filter(&self, row: SpotId) -> StoreResult<&[u8]> {
        Ok(&self.row_or_err(READ_FILTER, row)?.read_filter)
    }

    fn read_lengths(&self, row: SpotId) -> StoreResult<&[u32]> {
        Ok(&self.row_or_err(READ_LEN, row)?.read_len)
    }

    fn read_bases(&self, row: SpotId) -> StoreResult<&[u8]> {
        Ok(self.row_or_err(READ, row)?.read.as_bytes())
    }

    fn read_quality(&self, row: SpotId) -> StoreResult<&[u8]> {
        Ok(&self.row_or_err(QUALITY, row)?.quality)
    }
}

/// A row as written by [`StagedWriter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRow {
    pub read_filter: Vec<u8>,
    pub read: Option<Vec<u8>>,
    pub quality: Option<Vec<u8>>,
}

/// Insert-mode writer that stages rows until [`MemoryTable::apply`]
#[derive(Debug)]
pub struct StagedWriter {
    columns: WriteColumns,
    rows: BTreeMap<SpotId, StagedRow>,
    last_row: Option<SpotId>,
    committed: bool,
}

impl StagedWriter {
    /// Opens a writer on the given columns
    pub fn new(columns: WriteColumns) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
            last_row: None,
            committed: false,
        }
    }

    /// Columns this writer was opened with
    pub fn columns(&self) -> WriteColumns {
        self.columns
    }

    /// Staged row by id
    pub fn row(&self, id: SpotId) -> Option<&StagedRow> {
        self.rows.get(&id)
    }

    /// Number of staged rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing was written
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true once `commit` succeeded
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

impl DestinationTable for StagedWriter {
    fn write_row(&mut self, row: SpotId, write: &RowWrite<'_>) -> StoreResult<()> {
        if self.committed {
            return Err(StoreError::write_failed("cursor already committed")
                .with_details(format!("row: {}", row)));
        }
        if let Some(last) = self.last_row {
            if row <= last {
                return Err(StoreError::write_failed(format!(
                    "rows must be written in ascending order: {} after {}",
                    row, last
                )));
            }
        }
        match (write.payload, self.columns.includes_reads()) {
            (Some(_), false) => {
                return Err(StoreError::write_failed(format!(
                    "{} and {} were not added to the write cursor",
                    READ, QUALITY
                ))
                .with_details(format!("row: {}", row)));
            }
            (None, true) => {
                return Err(StoreError::write_failed(format!(
                    "missing {} and {} for row",
                    READ, QUALITY
                ))
                .with_details(format!("row: {}", row)));
            }
            _ => {}
        }

        self.rows.insert(
            row,
            StagedRow {
                read_filter: write.filter.to_vec(),
                read: write.payload.map(|p| p.bases.to_vec()),
                quality: write.payload.map(|p| p.quality.to_vec()),
            },
        );
        self.last_row = Some(row);
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if self.committed {
            return Err(StoreError::write_failed("cursor already committed"));
        }
        self.committed = true;
        Ok(())
    }
}
