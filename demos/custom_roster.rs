//! # Example: custom_roster
//!
//! Runs a fully deterministic drill over a hand-picked roster: fixed send
//! duration, success bias 1.0, and a raw bus receiver printing the launch
//! order with sequence numbers.
//!
//! Shows how to:
//! - Build a small [`Roster`] and deterministic policies.
//! - Watch events through [`Dispatcher::subscribe`] (no Subscribe impl).
//! - Query [`Dispatcher::state_of`] for one service mid-run.
//!
//! ## Run
//! ```bash
//! cargo run --example custom_roster
//! ```

use std::time::Duration;

use salvosim::{Dispatcher, EventKind, OutcomePolicy, Roster, ServiceId, SimConfig, WorkPolicy};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = SimConfig {
        work: WorkPolicy::fixed(Duration::from_millis(300)),
        outcome: OutcomePolicy { success_bias: 1.0 },
        horizon_margin: Duration::from_millis(200),
        ..SimConfig::default()
    };
    let roster = Roster::new(["ionbeacon", "jadeflare", "kitegram", "larkmail", "lumenbuzz"]);
    let dispatcher = Dispatcher::new(cfg, roster, Vec::new());

    let mut rx = dispatcher.subscribe();
    dispatcher.start_from_input("+98 912 345 6789", "0.5")?;

    // Every launch settles as `sent` (bias 1.0), so the run is a fixed
    // script: 5 launches, 5 settles, then the completion event.
    loop {
        let ev = rx.recv().await?;
        match ev.kind {
            EventKind::TaskLaunched => {
                let service = ev.service.as_deref().unwrap_or("<unknown>");
                let state = dispatcher
                    .state_of(&ServiceId::new(service))
                    .expect("service is on the roster");
                println!("#{:<3} launched {service} (board says {state})", ev.seq);
            }
            EventKind::TaskSent | EventKind::TaskFailed => {
                println!(
                    "#{:<3} settled  {} as {}",
                    ev.seq,
                    ev.service.as_deref().unwrap_or("<unknown>"),
                    ev.kind.as_label()
                );
            }
            EventKind::RunCancelled | EventKind::RunCompleted => {
                println!("#{:<3} run over: {}", ev.seq, ev.kind.as_label());
                break;
            }
        }
    }

    let tally = dispatcher.tally();
    println!(
        "\nafter close: idle={} (board resets on every stop), journal={} entries",
        tally.idle,
        dispatcher.journal().len()
    );

    Ok(())
}
