//! # Events emitted over the lifetime of a dispatch run.
//!
//! The [`EventKind`] enum classifies events into two categories:
//! - **Task events**: a single service launched or settled.
//! - **System events**: the run as a whole ended (cancelled or completed).
//!
//! The [`Event`] struct carries the metadata observers need: a journal
//! sequence number, wall-clock timestamp, the service involved (for task
//! events) and an optional human-readable message.
//!
//! ## Ordering guarantees
//! Sequence numbers are assigned by the journal, so among journaled entries
//! `seq` order is exactly insertion order. Bus-only events (launches) draw
//! from the same counter and interleave with journaled entries.
//!
//! ## Example
//! ```rust
//! use salvosim::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed).with_service("cloudhorn");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.service.as_deref(), Some("cloudhorn"));
//! assert!(!ev.kind.is_system());
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use crate::core::TaskState;

/// Classification of dispatch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task events ===
    /// A service's launch timer fired; the task is now `sending`.
    ///
    /// Pushed to the bus only, never journaled: the journal records how
    /// launches *settled*, not that they started.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `at`: wall-clock timestamp
    /// - `seq`: journal sequence
    TaskLaunched,

    /// A task settled successfully; the simulated gateway accepted it.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `at`: wall-clock timestamp
    /// - `seq`: journal sequence
    TaskSent,

    /// A task settled with a simulated failure.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `at`: wall-clock timestamp
    /// - `seq`: journal sequence
    TaskFailed,

    // === System events ===
    /// The run was stopped by the operator before the horizon.
    ///
    /// Sets:
    /// - `message`: short explanation
    /// - `at`: wall-clock timestamp
    /// - `seq`: journal sequence
    RunCancelled,

    /// The auto-stop horizon elapsed and the run closed on its own.
    ///
    /// Sets:
    /// - `message`: short explanation
    /// - `at`: wall-clock timestamp
    /// - `seq`: journal sequence
    RunCompleted,
}

impl EventKind {
    /// Short stable label for log lines and filters.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::TaskLaunched => "launched",
            EventKind::TaskSent => "sent",
            EventKind::TaskFailed => "failed",
            EventKind::RunCancelled => "cancelled",
            EventKind::RunCompleted => "completed",
        }
    }

    /// Returns `true` for events about the run as a whole.
    #[inline]
    pub fn is_system(&self) -> bool {
        matches!(self, EventKind::RunCancelled | EventKind::RunCompleted)
    }

    /// Returns `true` for the two settled task kinds.
    #[inline]
    pub fn is_terminal_task(&self) -> bool {
        matches!(self, EventKind::TaskSent | EventKind::TaskFailed)
    }

    /// Board state implied by a task event, if any.
    ///
    /// Useful for observers mirroring per-service state from the bus.
    pub fn task_state(&self) -> Option<TaskState> {
        match self {
            EventKind::TaskLaunched => Some(TaskState::Sending),
            EventKind::TaskSent => Some(TaskState::Sent),
            EventKind::TaskFailed => Some(TaskState::Error),
            EventKind::RunCancelled | EventKind::RunCompleted => None,
        }
    }
}

/// Dispatch event with optional metadata.
///
/// - `seq`: journal-assigned sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `service` is set on task events, `message` on system events
#[derive(Clone, Debug)]
pub struct Event {
    /// Sequence number, strictly increasing in journal insertion order.
    ///
    /// Zero until the journal stamps the event.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the service, for task events.
    pub service: Option<Arc<str>>,
    /// Human-readable note, for system events.
    pub message: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp.
    ///
    /// The sequence number starts at zero and is assigned when the event
    /// passes through the journal.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: 0,
            at: SystemTime::now(),
            kind,
            service: None,
            message: None,
        }
    }

    /// Attaches a service name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a human-readable message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(EventKind::RunCancelled.is_system());
        assert!(EventKind::RunCompleted.is_system());
        assert!(!EventKind::TaskLaunched.is_system());

        assert!(EventKind::TaskSent.is_terminal_task());
        assert!(EventKind::TaskFailed.is_terminal_task());
        assert!(!EventKind::TaskLaunched.is_terminal_task());
        assert!(!EventKind::RunCompleted.is_terminal_task());
    }

    #[test]
    fn test_task_state_mapping() {
        assert_eq!(EventKind::TaskLaunched.task_state(), Some(TaskState::Sending));
        assert_eq!(EventKind::TaskSent.task_state(), Some(TaskState::Sent));
        assert_eq!(EventKind::TaskFailed.task_state(), Some(TaskState::Error));
        assert_eq!(EventKind::RunCancelled.task_state(), None);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::new(EventKind::RunCancelled).with_message("stopped by operator");
        assert_eq!(ev.seq, 0, "journal assigns seq, not the constructor");
        assert_eq!(ev.message.as_deref(), Some("stopped by operator"));
        assert_eq!(ev.service, None);
    }
}
