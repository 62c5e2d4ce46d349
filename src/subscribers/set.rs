//! # Fan-out of run events to registered subscribers.
//!
//! The dispatcher's listener forwards every bus event here. [`SubscriberSet`]
//! hands each event to every subscriber through a bounded lane (queue plus a
//! dedicated worker task), so a subscriber that renders slowly (a TUI redraw,
//! a blocking sink) backs up only its own lane: the run, the bus and the
//! other subscribers never wait for it.
//!
//! Delivery is best-effort. When a lane is full the event is shed and counted
//! against that subscriber; nothing is retried. A panic inside a subscriber
//! is caught by its worker and counted the same way. The tallies are readable
//! through [`SubscriberSet::report`] while the set is live and come back one
//! final time from [`SubscriberSet::shutdown`], so a drill can tell whether
//! its observers kept up with the salvo.
//!
//! ```text
//! emit(&Event) ──┬─► [lane] ─► worker ─► console.on_event()
//!                ├─► [lane] ─► worker ─► progress.on_event()
//!                └─► [lane] ─► worker ─► collector.on_event()
//!
//!   lane full ─► shed + count            panic ─► catch + count
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::Event;

use super::Subscribe;

/// Delivery counters for one subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberReport {
    /// Name the subscriber gave via [`Subscribe::name`].
    pub name: &'static str,
    /// Events shed because the lane was full or its worker was gone.
    pub dropped: u64,
    /// Panics caught inside `on_event`.
    pub panicked: u64,
}

/// One subscriber's queue plus its counters.
struct Lane {
    name: &'static str,
    feed: mpsc::Sender<Event>,
    dropped: Arc<AtomicU64>,
    panicked: Arc<AtomicU64>,
}

/// Fan-out over the registered subscribers, one bounded lane each.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber, each behind a lane holding up to
    /// `queue` events (floored at 1).
    ///
    /// The dispatcher passes `SimConfig::subscriber_queue` here.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, queue: usize) -> Self {
        let queue = queue.max(1);
        let mut lanes = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (feed, mut inbox) = mpsc::channel::<Event>(queue);
            let dropped = Arc::new(AtomicU64::new(0));
            let panicked = Arc::new(AtomicU64::new(0));

            let panics = Arc::clone(&panicked);
            workers.push(tokio::spawn(async move {
                while let Some(ev) = inbox.recv().await {
                    let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
                    // First panic gets a stderr line; after that the counter
                    // alone tracks them.
                    if handled.is_err() && panics.fetch_add(1, Ordering::Relaxed) == 0 {
                        eprintln!(
                            "[salvosim] subscriber '{name}' panicked while handling an event"
                        );
                    }
                }
            }));

            lanes.push(Lane {
                name,
                feed,
                dropped,
                panicked,
            });
        }

        Self { lanes, workers }
    }

    /// Offers one event to every lane without waiting.
    ///
    /// A lane that cannot take it (full, or its worker is gone) sheds the
    /// event and bumps its drop counter; the other lanes are unaffected.
    pub fn emit(&self, event: &Event) {
        for lane in &self.lanes {
            if lane.feed.try_send(event.clone()).is_err() {
                lane.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Current delivery counters, one entry per subscriber in registration
    /// order.
    pub fn report(&self) -> Vec<SubscriberReport> {
        self.lanes
            .iter()
            .map(|lane| SubscriberReport {
                name: lane.name,
                dropped: lane.dropped.load(Ordering::Relaxed),
                panicked: lane.panicked.load(Ordering::Relaxed),
            })
            .collect()
    }

    /// Closes every lane, waits for the workers to drain what was already
    /// queued, and returns the final counters.
    pub async fn shutdown(self) -> Vec<SubscriberReport> {
        let tallies: Vec<_> = self
            .lanes
            .iter()
            .map(|lane| (lane.name, Arc::clone(&lane.dropped), Arc::clone(&lane.panicked)))
            .collect();

        drop(self.lanes);
        for worker in self.workers {
            let _ = worker.await;
        }

        tallies
            .into_iter()
            .map(|(name, dropped, panicked)| SubscriberReport {
                name,
                dropped: dropped.load(Ordering::Relaxed),
                panicked: panicked.load(Ordering::Relaxed),
            })
            .collect()
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Returns `true` when no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}
