//! # Example: basic_drill
//!
//! Runs the stock dispatch drill: the 38-service demo roster, default
//! policies, and a 100ms stagger parsed from raw operator input.
//!
//! Shows how to:
//! - Build a [`Dispatcher`] from [`SimConfig::default`] and [`Roster::demo`].
//! - Start a run with [`Dispatcher::start_from_input`].
//! - Poll [`Dispatcher::tally`] for progress while the run plays out.
//! - Read the journal after the horizon closes the run.
//!
//! ## Flow
//! ```text
//! start_from_input("0912 345 6789", "0.1")
//!     ├─► launch[i] fires at i × 100ms
//!     ├─► each launch: sending ──(0.5s..2s)──► sent | error
//!     └─► horizon watchdog ──► RunCompleted, everything idle
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_drill
//! ```

use std::time::Duration;

use salvosim::{Dispatcher, Roster, SimConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(SimConfig::default(), Roster::demo(), Vec::new());

    dispatcher.start_from_input("0912 345 6789", "0.1")?;

    let info = dispatcher.run_info().expect("run just started");
    println!(
        "drill started: target={} interval={:?} horizon={:?} services={}\n",
        info.target,
        info.interval,
        info.horizon,
        dispatcher.roster().len()
    );

    while dispatcher.is_active() {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let t = dispatcher.tally();
        println!(
            "[drill] idle={:<2} sending={:<2} sent={:<2} error={:<2}",
            t.idle, t.sending, t.sent, t.error
        );
    }

    println!("\njournal ({} entries):", dispatcher.journal().len());
    for entry in dispatcher.journal() {
        match (&entry.service, &entry.message) {
            (Some(service), _) => {
                println!("  #{:<3} {:<9} service={service}", entry.seq, entry.kind.as_label());
            }
            (None, Some(message)) => {
                println!("  #{:<3} {:<9} {message}", entry.seq, entry.kind.as_label());
            }
            (None, None) => println!("  #{:<3} {}", entry.seq, entry.kind.as_label()),
        }
    }

    Ok(())
}
