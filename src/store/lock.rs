//! Write-lock discipline for the destination store
//!
//! A locked run is unlocked for the duration of a redaction and is always
//! locked again on release, whether the run succeeded or not.

use super::errors::StoreResult;
use crate::observability::{log_event_with_fields, Event};

/// A store with an exclusive write lock flag
pub trait Lockable {
    /// Name used in log records
    fn name(&self) -> &str;

    /// Returns true if the store is locked against writes
    fn is_locked(&self) -> bool;

    /// Locks the store
    fn lock(&mut self) -> StoreResult<()>;

    /// Unlocks the store
    fn unlock(&mut self) -> StoreResult<()>;
}

/// Proof that the store was opened for writing.
///
/// Must be handed back through [`WriteAccess::release`] on every exit path.
#[derive(Debug)]
#[must_use = "write access must be released to re-lock the store"]
pub struct WriteAccess {
    was_locked: bool,
}

impl WriteAccess {
    /// Unlocks the store if it is locked
    pub fn acquire<L: Lockable + ?Sized>(store: &mut L) -> StoreResult<Self> {
        let was_locked = store.is_locked();
        if was_locked {
            store.unlock()?;
            log_event_with_fields(Event::StoreUnlocked, &[("run", store.name().to_string())]);
        }
        Ok(Self { was_locked })
    }

    /// Returns true if the store was locked before `acquire`
    pub fn was_locked(&self) -> bool {
        self.was_locked
    }

    /// Locks the store again
    pub fn release<L: Lockable + ?Sized>(self, store: &mut L) -> StoreResult<()> {
        store.lock()?;
        log_event_with_fields(
            Event::StoreRelocked,
            &[
                ("run", store.name().to_string()),
                ("was_locked", self.was_locked.to_string()),
            ],
        );
        Ok(())
    }
}
