//! Append-only indexed event log inside the metadata tree
//!
//! Events live under a fixed parent as `<prefix>_<n>`, `n` starting at 1.
//! An appended event is never touched again. Each event gets a `seal`
//! child last: `crc32:xxxxxxxx` over the serialized event without the seal,
//! so an event interrupted mid-write is detectable.

use crc32fast::Hasher;

use super::errors::{HistoryError, HistoryResult};
use crate::observability::{log_event_with_fields, Event};
use crate::store::MetaNode;

/// Name of the seal child
pub const SEAL: &str = "seal";

/// State of one event slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    /// Event is complete
    Sealed,
    /// Event exists but its seal is missing or wrong
    Partial,
    /// No event at this index
    Missing,
}

/// Formats a seal value
pub fn format_seal(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Computes the seal of an event, ignoring any existing seal child
pub fn compute_seal(event: &MetaNode) -> HistoryResult<String> {
    let mut unsealed = event.clone();
    unsealed.remove_child(SEAL);

    let bytes = serde_json::to_vec(&unsealed)
        .map_err(|e| HistoryError::format(format!("cannot serialize event: {}", e)))?;

    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(format_seal(hasher.finalize()))
}

/// Event log keyed by a contiguous 1-based index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedLog {
    parent: String,
    prefix: String,
}

impl IndexedLog {
    pub fn new(parent: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            prefix: prefix.into(),
        }
    }

    /// `HISTORY/EVENT_<n>`
    pub fn history() -> Self {
        Self::new("HISTORY", "EVENT")
    }

    /// `QC/history/event_<n>`
    pub fn qc_history() -> Self {
        Self::new("QC/history", "event")
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Child name for `index`
    pub fn child_name(&self, index: u32) -> String {
        format!("{}_{}", self.prefix, index)
    }

    /// Full metadata path for `index`
    pub fn event_path(&self, index: u32) -> String {
        format!("{}/{}", self.parent, self.child_name(index))
    }

    fn has_event(&self, parent: Option<&MetaNode>, index: u32) -> bool {
        parent.map_or(false, |p| p.child(&self.child_name(index)).is_some())
    }

    /// Index the next event will get.
    ///
    /// Starts one past the number of children. If that slot is taken, probes
    /// forward up to twice the start; finding no free slot is fatal.
    pub fn next_index(&self, meta: &MetaNode) -> HistoryResult<u32> {
        let parent = meta.open(&self.parent);
        let count = parent.map_or(0, MetaNode::child_count);
        let mut index = u32::try_from(count)
            .map_err(|_| HistoryError::corrupt(&self.parent, u32::MAX))?;

        if index > 0 && !self.has_event(parent, index) {
            log_event_with_fields(
                Event::HistoryIndexGap,
                &[("path", self.event_path(index))],
            );
        }

        index = index.saturating_add(1);

        if self.has_event(parent, index) {
            log_event_with_fields(
                Event::HistoryIndexProbe,
                &[("path", self.event_path(index))],
            );
            let limit = index.saturating_mul(2);
            while index < limit && self.has_event(parent, index) {
                index += 1;
            }
            if index >= limit {
                return Err(HistoryError::corrupt(&self.parent, limit));
            }
        }

        Ok(index)
    }

    /// Appends an event filled by `build` and seals it. Returns its index.
    pub fn append<F>(&self, meta: &mut MetaNode, build: F) -> HistoryResult<u32>
    where
        F: FnOnce(&mut MetaNode) -> HistoryResult<()>,
    {
        let index = self.next_index(meta)?;
        let path = self.event_path(index);
        let event = meta.open_update(&path);

        build(&mut *event)?;
        let seal = compute_seal(event)?;
        event.write_child(SEAL, seal);

        log_event_with_fields(Event::HistoryAppended, &[("path", path)]);
        Ok(index)
    }

    /// Checks the event at `index`
    pub fn inspect(&self, meta: &MetaNode, index: u32) -> EventState {
        let Some(event) = meta.open(&self.event_path(index)) else {
            return EventState::Missing;
        };
        let stored = event.child(SEAL).and_then(MetaNode::read);
        match (stored, compute_seal(event)) {
            (Some(stored), Ok(expected)) if stored == expected => EventState::Sealed,
            _ => EventState::Partial,
        }
    }

    /// Highest index present under the parent
    pub fn latest(&self, meta: &MetaNode) -> Option<u32> {
        let marker = format!("{}_", self.prefix);
        meta.open(&self.parent)?
            .child_names()
            .filter_map(|name| name.strip_prefix(marker.as_str()))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
    }
}
