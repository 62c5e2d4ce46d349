//! # Dispatcher: owns the roster, the board, the journal and the run slot.
//!
//! The [`Dispatcher`] is the orchestration entry point. It validates the
//! target, arms one staggered [`Launch`] per roster service plus a horizon
//! watchdog, and hands observers consistent snapshots while the run plays
//! out.
//!
//! ## Lifecycle
//! ```text
//! start(target, interval)
//!   ├─ validate target ──────────────► Err(InvalidTarget)
//!   ├─ slot occupied? ───────────────► Err(AlreadyActive)
//!   ├─ clear journal, reset board
//!   ├─ spawn launch[i] at offset i×interval   (i in roster order)
//!   ├─ spawn horizon watchdog
//!   └─ park session in the slot ─────► Ok(())
//!
//! stop()                 ──► cancel::halt(Cancelled)   (idempotent)
//! horizon elapses        ──► cancel::halt(Completed)
//! ```
//!
//! ## Horizon
//! The watchdog deadline is conservative: last launch offset plus the
//! worst-case send duration plus a fixed margin. Every launch has settled
//! by then, so the completion stop only ever finds terminal or idle
//! states. Stopping earlier by tracking settle counts would close runs
//! sooner but would tie teardown to journal traffic; the fixed deadline
//! keeps teardown independent of what the launches do.

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::SimConfig;
use crate::core::board::{StateBoard, Tally, TaskState};
use crate::core::cancel::{self, SessionSlot, StopCause};
use crate::core::launch::Launch;
use crate::core::session::{RunInfo, RunSession};
use crate::error::StartError;
use crate::events::{Bus, Event, Journal};
use crate::msisdn::Msisdn;
use crate::roster::{Roster, ServiceId};
use crate::subscribers::{Subscribe, SubscriberReport, SubscriberSet};

/// Staggered-dispatch simulator over a fixed service roster.
///
/// All methods take `&self`; the dispatcher is made for being shared
/// (`Arc<Dispatcher>`) between an operator surface and observers.
///
/// Must be used inside a Tokio runtime: construction spawns the listener
/// that fans bus events out to subscribers, and [`start`](Self::start)
/// spawns the run's timer tasks.
pub struct Dispatcher {
    cfg: SimConfig,
    bus: Bus,
    board: Arc<StateBoard>,
    journal: Arc<Journal>,
    session: Arc<SessionSlot>,
    subs: Arc<SubscriberSet>,
}

impl Dispatcher {
    /// Creates a dispatcher over `roster` and wires `subscribers` to the
    /// event bus.
    pub fn new(cfg: SimConfig, roster: Roster, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, cfg.subscriber_queue));

        let dispatcher = Self {
            cfg,
            bus,
            board: Arc::new(StateBoard::new(roster)),
            journal: Arc::new(Journal::new()),
            session: Arc::new(SessionSlot::default()),
            subs,
        };
        dispatcher.spawn_subscriber_listener();
        dispatcher
    }

    /// Bridges the bus to the subscriber set.
    ///
    /// Lagging only skips events; the listener stays up until the bus
    /// closes, which happens when the dispatcher is dropped.
    fn spawn_subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => subs.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Starts a run against `target`, launching one task per roster
    /// service at offsets `0, interval, 2×interval, …` in roster order.
    ///
    /// A refused start (bad target, run already active) changes nothing:
    /// the journal, board and any live run are left exactly as they were.
    pub fn start(&self, target: &str, interval: Duration) -> Result<(), StartError> {
        let target = Msisdn::parse(target)?;

        let mut slot = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(StartError::AlreadyActive);
        }

        self.journal.clear();
        self.board.reset();

        let horizon = horizon_for(&self.cfg, self.board.roster().len(), interval);
        let mut session = RunSession::new(target, interval, horizon);
        let token = session.token();
        let active = session.active_flag();

        for (position, service) in self.board.roster().iter().enumerate() {
            let launch = Launch {
                position,
                service: service.clone(),
                offset: launch_offset(interval, position),
                work: self.cfg.work,
                outcome: self.cfg.outcome,
                board: Arc::clone(&self.board),
                journal: Arc::clone(&self.journal),
                bus: self.bus.clone(),
                active: Arc::clone(&active),
            };
            session.spawn(launch.run(token.clone()));
        }

        let slot_ref = Arc::clone(&self.session);
        let board = Arc::clone(&self.board);
        let journal = Arc::clone(&self.journal);
        let bus = self.bus.clone();
        let watchdog_token = token.clone();
        session.spawn(async move {
            tokio::select! {
                _ = watchdog_token.cancelled() => {}
                _ = time::sleep(horizon) => {
                    cancel::halt(&slot_ref, &board, &journal, &bus, StopCause::Completed);
                }
            }
        });

        *slot = Some(session);
        Ok(())
    }

    /// Like [`start`](Self::start), but parses the interval from raw
    /// operator input, falling back to the configured default.
    pub fn start_from_input(&self, target: &str, raw_interval: &str) -> Result<(), StartError> {
        self.start(target, self.cfg.interval_from_input(raw_interval))
    }

    /// Stops the current run: pending launches are discarded, every state
    /// returns to `idle`, and exactly one cancellation entry is journaled.
    ///
    /// Returns `true` when this call stopped a run. Stopping an idle
    /// dispatcher is a no-op and returns `false`.
    pub fn stop(&self) -> bool {
        cancel::halt(
            &self.session,
            &self.board,
            &self.journal,
            &self.bus,
            StopCause::Cancelled,
        )
    }

    /// Whether a run currently holds the dispatcher.
    pub fn is_active(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Parameters of the current run, if one is active.
    pub fn run_info(&self) -> Option<RunInfo> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(RunSession::info)
    }

    /// Per-service states in roster order.
    pub fn states(&self) -> Vec<(ServiceId, TaskState)> {
        self.board.snapshot()
    }

    /// State of a single service, if it is on the roster.
    pub fn state_of(&self, id: &ServiceId) -> Option<TaskState> {
        self.board.get(id)
    }

    /// Counts of services per state.
    pub fn tally(&self) -> Tally {
        self.board.tally()
    }

    /// Journal entries of the current (or last) run, in order.
    pub fn journal(&self) -> Vec<Event> {
        self.journal.snapshot()
    }

    /// The roster this dispatcher fans out over.
    pub fn roster(&self) -> &Roster {
        self.board.roster()
    }

    /// New receiver for live events (launches, settles, run stops).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Delivery counters for the registered subscribers.
    ///
    /// Drops grow when a subscriber's queue cannot keep up with the run;
    /// panics when its `on_event` panicked.
    pub fn subscriber_report(&self) -> Vec<SubscriberReport> {
        self.subs.report()
    }

    /// Resolves once no run is active.
    ///
    /// Every stop publishes a system event, so waiting on the bus and
    /// re-checking the slot cannot miss the transition. Returns
    /// immediately when the dispatcher is already idle.
    pub async fn wait_idle(&self) {
        let mut rx = self.bus.subscribe();
        if !self.is_active() {
            return;
        }
        loop {
            match rx.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    if !self.is_active() {
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }
}

/// Offset of the launch at `position`: position × interval, saturating.
fn launch_offset(interval: Duration, position: usize) -> Duration {
    let steps = u32::try_from(position).unwrap_or(u32::MAX);
    interval.checked_mul(steps).unwrap_or(Duration::MAX)
}

/// Deadline after which a run closes itself: the last launch offset plus
/// the worst-case send duration plus the configured margin.
fn horizon_for(cfg: &SimConfig, roster_len: usize, interval: Duration) -> Duration {
    launch_offset(interval, roster_len.saturating_sub(1))
        .saturating_add(cfg.work.worst_case())
        .saturating_add(cfg.horizon_margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::WorkPolicy;

    #[test]
    fn test_launch_offsets_step_by_interval() {
        let interval = Duration::from_millis(400);
        assert_eq!(launch_offset(interval, 0), Duration::ZERO);
        assert_eq!(launch_offset(interval, 1), Duration::from_millis(400));
        assert_eq!(launch_offset(interval, 5), Duration::from_millis(2000));
    }

    #[test]
    fn test_launch_offset_saturates_instead_of_overflowing() {
        let offset = launch_offset(Duration::from_secs(u64::MAX / 2), 3);
        assert_eq!(offset, Duration::MAX);
    }

    #[test]
    fn test_horizon_covers_last_launch_plus_worst_case() {
        let cfg = SimConfig {
            work: WorkPolicy {
                min: Duration::from_millis(500),
                max: Duration::from_secs(2),
            },
            horizon_margin: Duration::from_millis(500),
            ..SimConfig::default()
        };
        // 3 services, 1s apart: last offset 2s + 2s worst case + 0.5s margin.
        assert_eq!(
            horizon_for(&cfg, 3, Duration::from_secs(1)),
            Duration::from_millis(4500)
        );
    }

    #[test]
    fn test_horizon_for_empty_and_single_rosters() {
        let cfg = SimConfig {
            work: WorkPolicy::fixed(Duration::from_millis(200)),
            horizon_margin: Duration::from_millis(100),
            ..SimConfig::default()
        };
        let flat = Duration::from_millis(300);
        assert_eq!(horizon_for(&cfg, 0, Duration::from_secs(9)), flat);
        assert_eq!(horizon_for(&cfg, 1, Duration::from_secs(9)), flat);
    }
}
