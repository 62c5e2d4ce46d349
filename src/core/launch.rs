//! # One staggered launch: offset sleep, send window, settle.
//!
//! Every roster service gets one [`Launch`] per run, spawned as a single
//! tokio task that covers the whole timeline:
//!
//! ```text
//! spawn ──(offset sleep)──► sending ──(work sleep)──► draw outcome ──► settle
//!            │ cancel                    │ cancel
//!            ▼                           ▼
//!          return                      return
//! ```
//!
//! Both sleeps race the run's cancellation token, and every board or
//! journal write re-checks the run's active flag inside the board's write
//! lock. A launch whose run was stopped leaves no trace: no state change,
//! no journal entry, no bus event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::board::{StateBoard, TaskState};
use crate::events::{Bus, Event, EventKind, Journal};
use crate::policies::{OutcomePolicy, TaskOutcome, WorkPolicy};
use crate::roster::ServiceId;

/// A single service's scheduled send for the current run.
pub(crate) struct Launch {
    /// Roster position; also the board slot this launch writes.
    pub(crate) position: usize,
    pub(crate) service: ServiceId,
    /// Delay before this launch fires (roster position × interval).
    pub(crate) offset: Duration,
    pub(crate) work: WorkPolicy,
    pub(crate) outcome: OutcomePolicy,
    pub(crate) board: Arc<StateBoard>,
    pub(crate) journal: Arc<Journal>,
    pub(crate) bus: Bus,
    /// Run-wide flag; checked under the board lock before every write.
    pub(crate) active: Arc<AtomicBool>,
}

impl Launch {
    /// Drives the launch to settlement or cancellation.
    pub(crate) async fn run(self, token: CancellationToken) {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = time::sleep(self.offset) => {}
        }

        if !self.mark_sending() {
            return;
        }

        let held_for = self.work.sample();
        tokio::select! {
            _ = token.cancelled() => return,
            _ = time::sleep(held_for) => {}
        }

        self.settle(self.outcome.draw());
    }

    /// Moves the board slot to `sending` and pushes a launch event.
    ///
    /// Returns `false` when the run went inactive first; the caller must
    /// then bail out without settling.
    fn mark_sending(&self) -> bool {
        let marked = self.board.with_write(|states| {
            if !self.active.load(Ordering::Acquire) {
                return false;
            }
            states[self.position] = TaskState::Sending;
            true
        });

        if marked {
            let ev = Event::new(EventKind::TaskLaunched).with_service(&self.service);
            self.bus.publish(self.journal.stamp(ev));
        }
        marked
    }

    /// Records the terminal state, journals it, and pushes it to the bus.
    ///
    /// The flag check, state write and journal append share one critical
    /// section, so a settle can never land after a stop's reset.
    fn settle(&self, outcome: TaskOutcome) {
        let (state, kind) = match outcome {
            TaskOutcome::Sent => (TaskState::Sent, EventKind::TaskSent),
            TaskOutcome::Failed => (TaskState::Error, EventKind::TaskFailed),
        };

        let entry = self.board.with_write(|states| {
            if !self.active.load(Ordering::Acquire) {
                return None;
            }
            states[self.position] = state;
            Some(
                self.journal
                    .append(Event::new(kind).with_service(&self.service)),
            )
        });

        if let Some(entry) = entry {
            self.bus.publish(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;

    fn launch_for(board: Arc<StateBoard>, journal: Arc<Journal>, active: bool) -> Launch {
        Launch {
            position: 0,
            service: ServiceId::new("a"),
            offset: Duration::ZERO,
            work: WorkPolicy::fixed(Duration::ZERO),
            outcome: OutcomePolicy { success_bias: 1.0 },
            board,
            journal,
            bus: Bus::new(8),
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    #[test]
    fn test_settle_records_state_and_journal_entry() {
        let board = Arc::new(StateBoard::new(Roster::new(["a"])));
        let journal = Arc::new(Journal::new());
        let launch = launch_for(Arc::clone(&board), Arc::clone(&journal), true);

        launch.settle(TaskOutcome::Failed);

        assert_eq!(board.get(&ServiceId::new("a")), Some(TaskState::Error));
        let entries = journal.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EventKind::TaskFailed);
        assert_eq!(entries[0].service.as_deref(), Some("a"));
    }

    #[test]
    fn test_inactive_run_suppresses_settle() {
        let board = Arc::new(StateBoard::new(Roster::new(["a"])));
        let journal = Arc::new(Journal::new());
        let launch = launch_for(Arc::clone(&board), Arc::clone(&journal), false);

        launch.settle(TaskOutcome::Sent);

        assert_eq!(board.get(&ServiceId::new("a")), Some(TaskState::Idle));
        assert_eq!(journal.len(), 0, "inactive settle must leave no trace");
    }

    #[test]
    fn test_inactive_run_suppresses_mark_sending() {
        let board = Arc::new(StateBoard::new(Roster::new(["a"])));
        let journal = Arc::new(Journal::new());
        let launch = launch_for(Arc::clone(&board), Arc::clone(&journal), false);

        assert!(!launch.mark_sending());
        assert_eq!(board.get(&ServiceId::new("a")), Some(TaskState::Idle));
    }

    #[test]
    fn test_mark_sending_pushes_bus_event_but_no_journal_entry() {
        let board = Arc::new(StateBoard::new(Roster::new(["a"])));
        let journal = Arc::new(Journal::new());
        let launch = launch_for(Arc::clone(&board), Arc::clone(&journal), true);
        let mut rx = launch.bus.subscribe();

        assert!(launch.mark_sending());

        assert_eq!(board.get(&ServiceId::new("a")), Some(TaskState::Sending));
        assert_eq!(journal.len(), 0, "launch events are bus-only");
        let ev = rx.try_recv().expect("launch event on the bus");
        assert_eq!(ev.kind, EventKind::TaskLaunched);
    }
}
