//! # One dispatch run and its handles.
//!
//! A [`RunSession`] owns everything that dies with a run: the active flag
//! that launch callbacks consult, the cancellation token their sleeps race
//! against, and the `JoinSet` holding every spawned timer task (launches
//! plus the horizon watchdog). Dropping the session aborts anything still
//! pending, so a cleared session slot can never leak timers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::msisdn::Msisdn;

/// Immutable facts about the current run, for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunInfo {
    /// Canonical target number the run dispatches to.
    pub target: Msisdn,
    /// Stagger interval between consecutive launches.
    pub interval: Duration,
    /// Delay after which the run closes itself.
    pub horizon: Duration,
}

/// Live state of the run currently holding the dispatcher.
#[derive(Debug)]
pub(crate) struct RunSession {
    target: Msisdn,
    interval: Duration,
    horizon: Duration,
    active: Arc<AtomicBool>,
    token: CancellationToken,
    timers: JoinSet<()>,
}

impl RunSession {
    pub(crate) fn new(target: Msisdn, interval: Duration, horizon: Duration) -> Self {
        Self {
            target,
            interval,
            horizon,
            active: Arc::new(AtomicBool::new(true)),
            token: CancellationToken::new(),
            timers: JoinSet::new(),
        }
    }

    /// Flag that launch callbacks re-check before touching the board.
    pub(crate) fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    /// Token that cancels every pending sleep of this run.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawns a timer task owned by this session.
    pub(crate) fn spawn<F>(&mut self, fut: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.timers.spawn(fut);
    }

    /// Flips the session inactive: once this returns, no callback will
    /// mutate the board or journal again.
    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Cancels pending sleeps and aborts every timer task.
    pub(crate) fn halt_timers(&mut self) {
        self.token.cancel();
        self.timers.abort_all();
    }

    pub(crate) fn info(&self) -> RunInfo {
        RunInfo {
            target: self.target.clone(),
            interval: self.interval,
            horizon: self.horizon,
        }
    }
}
