//! # Per-service state board.
//!
//! The [`StateBoard`] tracks one [`TaskState`] per roster service for the
//! current run. It is the synchronous heart of the simulator: launch tasks,
//! the stop path and UI snapshots all meet here, so every position is
//! guarded by a single `RwLock` held only for short, non-awaiting sections.
//!
//! The board always covers the full roster. States outside a run are all
//! `idle`; a run moves services through `sending` into `sent` or `error`,
//! and any stop (manual or horizon) puts everything back to `idle`.

use std::sync::{PoisonError, RwLock};

use crate::roster::{Roster, ServiceId};

/// Lifecycle of one simulated send task.
///
/// ```text
/// idle ──launch──► sending ──settle──► sent | error
///   ▲                                         │
///   └────────────── run stop ─────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskState {
    /// No launch pending or the run was stopped.
    #[default]
    Idle,
    /// Launch timer fired; the simulated send is in flight.
    Sending,
    /// Settled: the simulated gateway accepted the message.
    Sent,
    /// Settled: the simulated gateway rejected the message.
    Error,
}

impl TaskState {
    /// Short stable label for log lines and UIs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::Sending => "sending",
            TaskState::Sent => "sent",
            TaskState::Error => "error",
        }
    }

    /// Returns `true` once a task has settled and will not change again
    /// within the run.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Sent | TaskState::Error)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Counts of services per state, taken in one lock acquisition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Services with no launch in flight.
    pub idle: usize,
    /// Services currently holding a simulated send.
    pub sending: usize,
    /// Services settled successfully.
    pub sent: usize,
    /// Services settled with a simulated failure.
    pub error: usize,
}

impl Tally {
    /// Services that have settled either way.
    #[inline]
    pub fn settled(&self) -> usize {
        self.sent + self.error
    }

    /// Total services counted (always the roster size).
    #[inline]
    pub fn total(&self) -> usize {
        self.idle + self.sending + self.sent + self.error
    }
}

/// Shared map from roster position to [`TaskState`].
#[derive(Debug)]
pub(crate) struct StateBoard {
    roster: Roster,
    states: RwLock<Vec<TaskState>>,
}

impl StateBoard {
    /// Creates a board covering `roster`, everything `idle`.
    pub(crate) fn new(roster: Roster) -> Self {
        let states = vec![TaskState::Idle; roster.len()];
        Self {
            roster,
            states: RwLock::new(states),
        }
    }

    pub(crate) fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Runs `f` with the state vector write-locked.
    ///
    /// This is the critical section shared by launch callbacks and the stop
    /// path: flag checks, state writes and journal appends that must be
    /// atomic with respect to each other all happen inside `f`. Keep it
    /// synchronous and short.
    pub(crate) fn with_write<R>(&self, f: impl FnOnce(&mut Vec<TaskState>) -> R) -> R {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut states)
    }

    /// Puts every service back to `idle`.
    pub(crate) fn reset(&self) {
        self.with_write(|states| states.fill(TaskState::Idle));
    }

    /// State of one service, if it is on the roster.
    pub(crate) fn get(&self, id: &ServiceId) -> Option<TaskState> {
        let idx = self.roster.position(id)?;
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        states.get(idx).copied()
    }

    /// Copies the whole board in roster order.
    pub(crate) fn snapshot(&self) -> Vec<(ServiceId, TaskState)> {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        self.roster
            .iter()
            .cloned()
            .zip(states.iter().copied())
            .collect()
    }

    /// Counts services per state.
    pub(crate) fn tally(&self) -> Tally {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        let mut tally = Tally::default();
        for state in states.iter() {
            match state {
                TaskState::Idle => tally.idle += 1,
                TaskState::Sending => tally.sending += 1,
                TaskState::Sent => tally.sent += 1,
                TaskState::Error => tally.error += 1,
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_roster() -> Roster {
        Roster::new(["a", "b", "c"])
    }

    #[test]
    fn test_new_board_is_all_idle() {
        let board = StateBoard::new(small_roster());
        let snap = board.snapshot();
        assert_eq!(snap.len(), 3);
        assert!(snap.iter().all(|(_, s)| *s == TaskState::Idle));
        assert_eq!(board.tally().idle, 3);
    }

    #[test]
    fn test_snapshot_keeps_roster_order() {
        let board = StateBoard::new(small_roster());
        board.with_write(|states| states[1] = TaskState::Sending);

        let snap = board.snapshot();
        assert_eq!(snap[0].0.as_str(), "a");
        assert_eq!(snap[1], (ServiceId::new("b"), TaskState::Sending));
        assert_eq!(snap[2].1, TaskState::Idle);
    }

    #[test]
    fn test_get_by_service() {
        let board = StateBoard::new(small_roster());
        board.with_write(|states| states[2] = TaskState::Sent);

        assert_eq!(board.get(&ServiceId::new("c")), Some(TaskState::Sent));
        assert_eq!(board.get(&ServiceId::new("a")), Some(TaskState::Idle));
        assert_eq!(board.get(&ServiceId::new("missing")), None);
    }

    #[test]
    fn test_reset_returns_everything_to_idle() {
        let board = StateBoard::new(small_roster());
        board.with_write(|states| {
            states[0] = TaskState::Sent;
            states[1] = TaskState::Error;
            states[2] = TaskState::Sending;
        });

        board.reset();
        assert_eq!(board.tally(), Tally { idle: 3, ..Tally::default() });
    }

    #[test]
    fn test_tally_counts_every_state() {
        let board = StateBoard::new(Roster::new(["a", "b", "c", "d"]));
        board.with_write(|states| {
            states[0] = TaskState::Sending;
            states[1] = TaskState::Sent;
            states[2] = TaskState::Error;
        });

        let tally = board.tally();
        assert_eq!(tally.idle, 1);
        assert_eq!(tally.sending, 1);
        assert_eq!(tally.sent, 1);
        assert_eq!(tally.error, 1);
        assert_eq!(tally.settled(), 2);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_state_labels_and_terminality() {
        assert_eq!(TaskState::Idle.as_label(), "idle");
        assert_eq!(TaskState::Sending.to_string(), "sending");
        assert!(TaskState::Sent.is_terminal());
        assert!(TaskState::Error.is_terminal());
        assert!(!TaskState::Idle.is_terminal());
        assert!(!TaskState::Sending.is_terminal());
    }
}
