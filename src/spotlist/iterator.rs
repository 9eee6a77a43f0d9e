//! Merge of the spot id range against the redaction list
//!
//! Walks every spot of the run once, in ascending order, and peeks the head
//! of the list to decide whether the current spot is redacted.

use std::io::Read;

use super::errors::{SpotListError, SpotListResult};
use super::reader::SpotListReader;
use super::SpotId;
use crate::store::IdRange;

/// Decision for one traversed spot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotDecision {
    pub id: SpotId,
    pub redact: bool,
}

/// Single-pass ascending sweep over a spot range
pub struct SpotIterator<R: Read> {
    list: SpotListReader<R>,
    next_spot: SpotId,
    remaining: u64,
    pending: Option<SpotId>,
    current: Option<SpotId>,
}

impl<R: Read> SpotIterator<R> {
    /// Starts a sweep over `range`.
    ///
    /// The first list entry is read here, so an invalid first entry fails
    /// before any spot is traversed.
    pub fn new(mut list: SpotListReader<R>, range: IdRange) -> SpotListResult<Self> {
        let pending = list.next_id()?;
        Ok(Self {
            list,
            next_spot: range.first,
            remaining: range.count,
            pending,
            current: None,
        })
    }

    /// List entry not yet matched
    pub fn pending(&self) -> Option<SpotId> {
        self.pending
    }

    /// Spot most recently advanced to, including one that failed
    pub fn current(&self) -> Option<SpotId> {
        self.current
    }

    /// Returns the next spot and whether it is redacted.
    ///
    /// A matching spot advances the list. A list error is returned in place
    /// of the matching spot, so that spot is never written.
    pub fn next_spot(&mut self) -> SpotListResult<Option<SpotDecision>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let id = self.next_spot;
        self.current = Some(id);
        self.next_spot += 1;
        self.remaining -= 1;

        let redact = self.pending == Some(id);
        if redact {
            self.pending = self.list.next_id()?;
        }

        Ok(Some(SpotDecision { id, redact }))
    }

    /// Ends a complete sweep. A list entry that was never reached is fatal.
    pub fn finish(self) -> SpotListResult<()> {
        match self.pending {
            Some(id) => Err(SpotListError::unconsumed_entry(
                id,
                self.next_spot.saturating_sub(1),
            )
            .with_path(self.list.path().to_string())),
            None => Ok(()),
        }
    }
}
