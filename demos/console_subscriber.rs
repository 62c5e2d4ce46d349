//! # Example: console_subscriber
//!
//! Demonstrates how to build and attach a custom event subscriber, and how
//! to stop a run early from the keyboard.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - Inspect [`Event`] / [`EventKind`] as the run plays out.
//! - Wire the subscriber into [`Dispatcher::new`].
//! - Race [`Dispatcher::wait_idle`] against Ctrl-C for an early stop.
//!
//! ## Flow
//! ```text
//! start(target, 250ms)
//!     ├─► launch tasks publish TaskLaunched / TaskSent / TaskFailed
//!     ├─► subscriber listener ──► SubscriberSet ──► ConsoleSubscriber.on_event()
//!     └─► Ctrl-C ──► Dispatcher::stop() ──► RunCancelled
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example console_subscriber
//! ```

use std::sync::Arc;
use std::time::Duration;

use salvosim::{Dispatcher, Event, EventKind, Roster, SimConfig, Subscribe};

/// A simple console subscriber that prints every event.
/// In real life, you could feed a TUI, export metrics, or ship logs.
struct ConsoleSubscriber;

#[async_trait::async_trait]
impl Subscribe for ConsoleSubscriber {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            // === Task events ===
            EventKind::TaskLaunched => {
                println!(
                    "[sub] launched: service={}",
                    ev.service.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::TaskSent => {
                println!(
                    "[sub] sent:     service={}",
                    ev.service.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::TaskFailed => {
                println!(
                    "[sub] failed:   service={}",
                    ev.service.as_deref().unwrap_or("<unknown>")
                );
            }

            // === System events ===
            EventKind::RunCancelled => {
                println!(
                    "[sub] cancelled: {}",
                    ev.message.as_deref().unwrap_or("<no message>")
                );
            }
            EventKind::RunCompleted => {
                println!(
                    "[sub] completed: {}",
                    ev.message.as_deref().unwrap_or("<no message>")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("console_subscriber demo (Ctrl-C stops the run early)\n");

    let roster = Roster::new([
        "aeropush", "beaconly", "cloudhorn", "daisycast", "echofleet", "fernsignal", "galepost",
        "harborsend",
    ]);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(ConsoleSubscriber)];
    let dispatcher = Dispatcher::new(SimConfig::default(), roster, subs);

    dispatcher.start("09123456789", Duration::from_millis(250))?;

    tokio::select! {
        _ = dispatcher.wait_idle() => {
            println!("\nrun closed on its own");
        }
        _ = tokio::signal::ctrl_c() => {
            let stopped = dispatcher.stop();
            println!("\nCtrl-C: stop performed={stopped}");
        }
    }

    let journal = dispatcher.journal();
    println!("journal holds {} entries; last = {:?}", journal.len(), journal.last().map(|e| e.kind));

    for sub in dispatcher.subscriber_report() {
        println!(
            "subscriber '{}': dropped={} panicked={}",
            sub.name, sub.dropped, sub.panicked
        );
    }

    Ok(())
}
