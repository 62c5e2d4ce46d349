//! # Run teardown, shared by manual stop and the horizon watchdog.
//!
//! [`halt`] is the single way a run ends. Both callers funnel through it:
//! the operator via `Dispatcher::stop`, and the horizon watchdog when the
//! run outlives its deadline. Because the session slot mutex serializes
//! them, exactly one caller wins; the loser observes an empty slot and
//! reports that nothing was stopped.
//!
//! Teardown order is fixed:
//! 1. take the session out of the slot (new starts now see it free,
//!    `is_active` reports false);
//! 2. flip the active flag so in-flight callbacks stop writing;
//! 3. cancel the token and abort every timer task;
//! 4. under the board lock: reset all states to `idle` and append exactly
//!    one system entry to the journal;
//! 5. publish that entry to the bus.
//!
//! The slot stays locked through step 5, so a `start` racing the teardown
//! cannot clear the journal before the system entry lands.

use std::sync::{Mutex, PoisonError};

use crate::core::board::{StateBoard, TaskState};
use crate::core::session::RunSession;
use crate::events::{Bus, Event, EventKind, Journal};

/// Holder of the (at most one) live run.
pub(crate) type SessionSlot = Mutex<Option<RunSession>>;

/// Why a run is being torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StopCause {
    /// The operator asked for it.
    Cancelled,
    /// The auto-stop horizon elapsed.
    Completed,
}

impl StopCause {
    fn kind(self) -> EventKind {
        match self {
            StopCause::Cancelled => EventKind::RunCancelled,
            StopCause::Completed => EventKind::RunCompleted,
        }
    }

    fn note(self) -> &'static str {
        match self {
            StopCause::Cancelled => "dispatch stopped by operator",
            StopCause::Completed => "horizon elapsed; run closed",
        }
    }
}

/// Tears down the current run, if there is one.
///
/// Returns `true` when this call performed the stop, `false` when no run
/// was active (stopping twice is a no-op, not an error).
pub(crate) fn halt(
    slot: &SessionSlot,
    board: &StateBoard,
    journal: &Journal,
    bus: &Bus,
    cause: StopCause,
) -> bool {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(mut session) = guard.take() else {
        return false;
    };

    session.deactivate();
    session.halt_timers();

    let entry = board.with_write(|states| {
        states.fill(TaskState::Idle);
        journal.append(Event::new(cause.kind()).with_message(cause.note()))
    });
    bus.publish(entry);
    true
}
