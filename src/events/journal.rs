//! # Append-only journal of a dispatch run.
//!
//! The [`Journal`] is the durable (in-memory) record of what a run did:
//! every settled task and every run-level stop lands here, in order, each
//! stamped with a sequence number. Launch events skip the journal and only
//! travel the bus.
//!
//! ## Rules
//! - **Append-only**: entries are never edited or removed mid-run; the only
//!   mutation besides `append` is `clear`, at the boundary of a new run.
//! - **Monotonic**: `seq` is strictly increasing in insertion order because
//!   stamping happens while the entry list is locked.
//! - **One counter**: bus-only events are stamped from the same counter, so
//!   a `seq` is unique across the dispatcher's lifetime, not just one run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::event::Event;

/// Sequenced, append-only record of journaled events.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    next_seq: AtomicU64,
    entries: Mutex<Vec<Event>>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stamps `entry` with the next sequence number and stores it.
    ///
    /// Returns the stamped entry so callers can also publish it.
    pub(crate) fn append(&self, mut entry: Event) -> Event {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entry.seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        entries.push(entry.clone());
        entry
    }

    /// Stamps `entry` without storing it (for bus-only events).
    pub(crate) fn stamp(&self, mut entry: Event) -> Event {
        entry.seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        entry
    }

    /// Drops all entries. The sequence counter keeps running.
    pub(crate) fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Copies the current entries, in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<Event> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
