//! Run lifecycle tests: start refusals, staggered launches, stop semantics,
//! horizon auto-close, and journal/bus consistency.
//!
//! Timing-sensitive checks keep at least 300ms of slack on either side of
//! every deadline so they hold on slow runners.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use salvosim::{
    Dispatcher, Event, EventKind, OutcomePolicy, Roster, ServiceId, SimConfig, StartError,
    Subscribe, SubscriberReport, SubscriberSet, TaskState, WorkPolicy,
};

const TARGET: &str = "09123456789";

/// Config for runs that settle almost immediately and close fast.
fn quick_cfg() -> SimConfig {
    SimConfig {
        default_interval: Duration::from_millis(100),
        work: WorkPolicy::fixed(Duration::from_millis(10)),
        outcome: OutcomePolicy { success_bias: 1.0 },
        horizon_margin: Duration::from_millis(150),
        bus_capacity: 256,
        subscriber_queue: 64,
    }
}

fn dispatcher_with(cfg: SimConfig, names: &[&str]) -> Dispatcher {
    Dispatcher::new(
        cfg,
        Roster::new(names.iter().copied().map(str::to_owned)),
        Vec::new(),
    )
}

fn state_of(d: &Dispatcher, name: &str) -> TaskState {
    d.state_of(&ServiceId::new(name.to_owned()))
        .expect("service is on the roster")
}

fn system_entries(journal: &[Event]) -> Vec<EventKind> {
    journal
        .iter()
        .filter(|e| e.kind.is_system())
        .map(|e| e.kind)
        .collect()
}

/// Polls `check` every 25ms until it returns true or `deadline` passes.
async fn eventually(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}

// =============================================================================
// Test 1: start refusals leave the dispatcher untouched
// =============================================================================

#[tokio::test]
async fn test_start_rejects_invalid_target() {
    let d = dispatcher_with(quick_cfg(), &["a", "b", "c"]);

    // One digit short after the country code.
    let err = d
        .start("98912345678", Duration::ZERO)
        .expect_err("truncated number must be rejected");
    assert!(matches!(err, StartError::InvalidTarget(_)));

    assert!(!d.is_active(), "refused start must not open a run");
    assert!(d.journal().is_empty(), "refused start must not journal");
    assert!(d.states().iter().all(|(_, s)| *s == TaskState::Idle));
}

#[tokio::test]
async fn test_start_rejects_double_start_and_keeps_run() {
    let d = dispatcher_with(quick_cfg(), &["a", "b", "c"]);
    d.start(TARGET, Duration::ZERO).expect("first start");

    let err = d
        .start("+989123456789", Duration::ZERO)
        .expect_err("second start must be refused");
    assert!(matches!(err, StartError::AlreadyActive));

    // The refusal must not have disturbed the first run.
    d.wait_idle().await;
    let journal = d.journal();
    let sent = journal
        .iter()
        .filter(|e| e.kind == EventKind::TaskSent)
        .count();
    assert_eq!(sent, 3, "first run must settle every service");
    assert_eq!(system_entries(&journal), [EventKind::RunCompleted]);
}

// =============================================================================
// Test 2: zero interval settles every service, then the horizon closes
// =============================================================================

#[tokio::test]
async fn test_zero_interval_run_completes_with_one_entry_per_service() {
    let d = dispatcher_with(quick_cfg(), &["a", "b", "c"]);
    d.start(TARGET, Duration::ZERO).expect("start");
    d.wait_idle().await;

    let journal = d.journal();
    assert_eq!(
        journal.len(),
        4,
        "three settles + one completion, got {journal:#?}"
    );
    let task_entries: Vec<_> = journal.iter().filter(|e| !e.kind.is_system()).collect();
    assert_eq!(task_entries.len(), 3, "exactly one terminal entry per service");
    assert!(task_entries.iter().all(|e| e.kind == EventKind::TaskSent));

    let last = journal.last().expect("journal not empty");
    assert_eq!(last.kind, EventKind::RunCompleted, "system entry closes the run");

    assert!(!d.is_active());
    assert!(
        d.states().iter().all(|(_, s)| *s == TaskState::Idle),
        "completion resets every state to idle"
    );
}

// =============================================================================
// Test 3: launches fire in roster order at interval offsets
// =============================================================================

#[tokio::test]
async fn test_launch_offsets_stagger_in_roster_order() {
    let cfg = SimConfig {
        // Long sends keep early launches visibly in `sending`.
        work: WorkPolicy::fixed(Duration::from_secs(5)),
        ..quick_cfg()
    };
    let d = dispatcher_with(cfg, &["first", "second", "third"]);
    d.start(TARGET, Duration::from_millis(500)).expect("start");

    let names: Vec<_> = d.states().iter().map(|(id, _)| id.to_string()).collect();
    assert_eq!(names, ["first", "second", "third"], "board follows roster order");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(state_of(&d, "first"), TaskState::Sending, "offset 0 fires first");
    assert_eq!(state_of(&d, "second"), TaskState::Idle, "offset 500ms not yet due");
    assert_eq!(state_of(&d, "third"), TaskState::Idle, "offset 1s not yet due");

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(state_of(&d, "second"), TaskState::Sending, "second fires at 500ms");
    assert_eq!(state_of(&d, "third"), TaskState::Idle, "third only due at 1s");

    assert!(d.stop());
}

// =============================================================================
// Test 4: stop before the first launch leaves no task entries
// =============================================================================

#[tokio::test]
async fn test_stop_before_first_launch_leaves_no_task_entries() {
    let d = dispatcher_with(quick_cfg(), &["a", "b", "c"]);
    d.start(TARGET, Duration::from_secs(10)).expect("start");

    assert!(d.stop(), "stop with pending launches must report true");
    assert!(!d.is_active());
    assert!(d.states().iter().all(|(_, s)| *s == TaskState::Idle));

    let journal = d.journal();
    assert_eq!(journal.len(), 1, "only the cancellation entry: {journal:#?}");
    assert_eq!(journal[0].kind, EventKind::RunCancelled);

    // No zombie timers: nothing may append after the stop.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(d.journal().len(), 1, "a cancelled run must stay silent");
    assert!(d.states().iter().all(|(_, s)| *s == TaskState::Idle));
}

// =============================================================================
// Test 5: stop is idempotent
// =============================================================================

#[tokio::test]
async fn test_stop_is_idempotent() {
    let d = dispatcher_with(quick_cfg(), &["a", "b"]);
    d.start(TARGET, Duration::from_secs(10)).expect("start");

    assert!(d.stop(), "first stop performs the teardown");
    assert!(!d.stop(), "second stop is a no-op");
    assert!(!d.stop(), "every further stop is a no-op");

    assert_eq!(
        system_entries(&d.journal()),
        [EventKind::RunCancelled],
        "idempotent stops journal exactly one entry"
    );
}

#[tokio::test]
async fn test_stop_without_any_run_is_a_no_op() {
    let d = dispatcher_with(quick_cfg(), &["a"]);
    assert!(!d.stop());
    assert!(d.journal().is_empty());
}

// =============================================================================
// Test 6: stopping mid-send discards in-flight outcomes
// =============================================================================

#[tokio::test]
async fn test_stop_mid_sending_discards_outcomes() {
    let cfg = SimConfig {
        work: WorkPolicy::fixed(Duration::from_millis(500)),
        ..quick_cfg()
    };
    let d = dispatcher_with(cfg, &["a", "b", "c"]);
    d.start(TARGET, Duration::ZERO).expect("start");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(d.tally().sending, 3, "all launches should be holding sends");

    assert!(d.stop());
    assert!(d.states().iter().all(|(_, s)| *s == TaskState::Idle));
    assert_eq!(
        d.journal().len(),
        1,
        "in-flight sends must not settle after the stop"
    );

    // Sleep past the moment the sends would have settled.
    tokio::time::sleep(Duration::from_millis(700)).await;
    let journal = d.journal();
    assert_eq!(journal.len(), 1, "discarded outcomes must never surface");
    assert_eq!(journal[0].kind, EventKind::RunCancelled);
}

// =============================================================================
// Test 7: failures settle as error states and failed entries
// =============================================================================

#[tokio::test]
async fn test_failed_outcomes_reach_board_and_journal() {
    let cfg = SimConfig {
        outcome: OutcomePolicy { success_bias: 0.0 },
        horizon_margin: Duration::from_millis(400),
        ..quick_cfg()
    };
    let d = dispatcher_with(cfg, &["a", "b", "c"]);
    d.start(TARGET, Duration::ZERO).expect("start");

    // All sends settle within ~10ms; the horizon is still ~400ms away.
    tokio::time::sleep(Duration::from_millis(150)).await;
    let tally = d.tally();
    assert_eq!(tally.error, 3, "bias 0.0 must fail every service");
    assert_eq!(tally.settled(), 3);

    d.wait_idle().await;
    let journal = d.journal();
    let failed = journal
        .iter()
        .filter(|e| e.kind == EventKind::TaskFailed)
        .count();
    assert_eq!(failed, 3);
    assert_eq!(journal.last().map(|e| e.kind), Some(EventKind::RunCompleted));
    assert!(d.states().iter().all(|(_, s)| *s == TaskState::Idle));
}

// =============================================================================
// Test 8: a new run clears the previous journal
// =============================================================================

#[tokio::test]
async fn test_new_run_clears_previous_journal() {
    let d = dispatcher_with(quick_cfg(), &["a", "b"]);
    d.start(TARGET, Duration::ZERO).expect("first run");
    d.wait_idle().await;
    assert_eq!(d.journal().len(), 3, "two settles + completion");

    // No await between start and the assert: on the current-thread runtime
    // the fresh launches cannot have been polled yet, so whatever the
    // journal holds here came from the clear.
    d.start(TARGET, Duration::from_secs(5)).expect("second run");
    assert!(
        d.journal().is_empty(),
        "starting a run must clear the previous journal"
    );
    assert!(d.stop());
}

// =============================================================================
// Test 9: run_info reflects parameters; horizon is conservative
// =============================================================================

#[tokio::test]
async fn test_run_info_reports_parameters_and_clears_on_stop() {
    let cfg = SimConfig {
        work: WorkPolicy {
            min: Duration::from_millis(100),
            max: Duration::from_secs(1),
        },
        horizon_margin: Duration::from_millis(500),
        ..quick_cfg()
    };
    let d = dispatcher_with(cfg, &["a", "b", "c"]);

    assert!(d.run_info().is_none());
    d.start("0912 345 6789", Duration::from_millis(200)).expect("start");

    let info = d.run_info().expect("active run");
    assert_eq!(info.target.as_str(), "+989123456789");
    assert_eq!(info.interval, Duration::from_millis(200));
    // Last offset (2 × 200ms) + worst-case send (1s) + margin (500ms).
    assert_eq!(info.horizon, Duration::from_millis(1900));

    assert!(d.stop());
    assert!(d.run_info().is_none(), "stop clears the session");
}

#[tokio::test]
async fn test_start_from_input_falls_back_to_default_interval() {
    let cfg = SimConfig {
        default_interval: Duration::from_millis(50),
        work: WorkPolicy::fixed(Duration::from_secs(5)),
        ..quick_cfg()
    };
    let d = dispatcher_with(cfg, &["a", "b"]);

    d.start_from_input(TARGET, "not-a-number").expect("start");
    let info = d.run_info().expect("active run");
    assert_eq!(info.interval, Duration::from_millis(50));
    assert!(d.stop());

    d.start_from_input(TARGET, "0.25").expect("restart");
    let info = d.run_info().expect("active run");
    assert_eq!(info.interval, Duration::from_millis(250));
    assert!(d.stop());
}

// =============================================================================
// Test 10: wait_idle
// =============================================================================

#[tokio::test]
async fn test_wait_idle_returns_immediately_when_no_run() {
    let d = dispatcher_with(quick_cfg(), &["a"]);
    tokio::time::timeout(Duration::from_secs(1), d.wait_idle())
        .await
        .expect("wait_idle must not hang on an idle dispatcher");
}

// =============================================================================
// Test 11: bus ordering, launch precedes settle
// =============================================================================

#[tokio::test]
async fn test_bus_pushes_launch_before_settle() {
    let d = dispatcher_with(quick_cfg(), &["solo"]);
    let mut rx = d.subscribe();
    d.start(TARGET, Duration::ZERO).expect("start");

    let mut kinds = Vec::new();
    let mut seqs = Vec::new();
    loop {
        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("run must close within the horizon")
            .expect("bus stays open while the dispatcher lives");
        kinds.push(ev.kind);
        seqs.push(ev.seq);
        if ev.kind.is_system() {
            break;
        }
    }

    assert_eq!(
        kinds,
        [
            EventKind::TaskLaunched,
            EventKind::TaskSent,
            EventKind::RunCompleted
        ],
        "a single deterministic launch has a fixed script"
    );
    assert!(
        seqs.windows(2).all(|w| w[0] < w[1]),
        "bus events carry increasing seq: {seqs:?}"
    );
}

// =============================================================================
// Test 12: subscriber fan-out
// =============================================================================

#[derive(Default)]
struct Collector {
    seen: Mutex<Vec<EventKind>>,
}

#[async_trait::async_trait]
impl Subscribe for Collector {
    async fn on_event(&self, ev: &Event) {
        self.seen.lock().expect("collector lock").push(ev.kind);
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

impl Collector {
    fn kinds(&self) -> Vec<EventKind> {
        self.seen.lock().expect("collector lock").clone()
    }
}

#[tokio::test]
async fn test_subscriber_receives_run_events() {
    let collector = Arc::new(Collector::default());
    let d = Dispatcher::new(
        quick_cfg(),
        Roster::new(["solo"]),
        vec![Arc::clone(&collector) as Arc<dyn Subscribe>],
    );

    d.start(TARGET, Duration::ZERO).expect("start");
    d.wait_idle().await;

    // Delivery is asynchronous; give the worker a moment to drain.
    let delivered = eventually(Duration::from_secs(2), || {
        collector.kinds().contains(&EventKind::RunCompleted)
    })
    .await;
    assert!(delivered, "subscriber must see the completion event");

    let kinds = collector.kinds();
    assert!(kinds.contains(&EventKind::TaskLaunched), "got {kinds:?}");
    assert!(kinds.contains(&EventKind::TaskSent), "got {kinds:?}");

    let report = d.subscriber_report();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].name, "collector");
    assert_eq!(report[0].dropped, 0, "this volume must not shed events");
    assert_eq!(report[0].panicked, 0);
}

#[tokio::test]
async fn test_subscriber_set_shutdown_drains_queued_events() {
    let collector = Arc::new(Collector::default());
    let set = SubscriberSet::new(vec![Arc::clone(&collector) as Arc<dyn Subscribe>], 16);
    assert_eq!(set.len(), 1);
    assert!(!set.is_empty());

    for kind in [EventKind::TaskLaunched, EventKind::TaskSent, EventKind::RunCompleted] {
        set.emit(&Event::new(kind).with_service("solo"));
    }
    let report = set.shutdown().await;

    assert_eq!(
        collector.kinds(),
        [EventKind::TaskLaunched, EventKind::TaskSent, EventKind::RunCompleted],
        "shutdown must deliver everything already queued, in order"
    );
    assert_eq!(
        report,
        [SubscriberReport {
            name: "collector",
            dropped: 0,
            panicked: 0
        }],
        "a clean drain leaves all counters at zero"
    );
}

// =============================================================================
// Test 13: stop racing live settles on a parallel runtime
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_stop_race_keeps_journal_consistent() {
    let cfg = SimConfig {
        work: WorkPolicy::fixed(Duration::from_millis(50)),
        horizon_margin: Duration::from_millis(300),
        ..quick_cfg()
    };
    let d = Arc::new(Dispatcher::new(
        cfg,
        Roster::new(["a", "b", "c", "d", "e", "f", "g", "h"]),
        Vec::new(),
    ));
    d.start(TARGET, Duration::ZERO).expect("start");

    // Stop lands while sends are settling on another worker thread.
    let stopper = Arc::clone(&d);
    let stopped = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        stopper.stop()
    })
    .await
    .expect("stopper task");
    assert!(stopped, "the racing stop must win over the horizon");

    // Sleep past both the sends and the would-be horizon.
    tokio::time::sleep(Duration::from_millis(600)).await;

    let journal = d.journal();
    assert_eq!(
        system_entries(&journal),
        [EventKind::RunCancelled],
        "exactly one system entry, no completion after a manual stop"
    );
    assert_eq!(
        journal.last().map(|e| e.kind),
        Some(EventKind::RunCancelled),
        "nothing may append after the stop entry: {journal:#?}"
    );
    let seqs: Vec<u64> = journal.iter().map(|e| e.seq).collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]), "seq order broken: {seqs:?}");

    assert!(d.states().iter().all(|(_, s)| *s == TaskState::Idle));
    assert_eq!(d.tally().total(), 8);
    assert!(!d.is_active());
}

// =============================================================================
// Test 14: empty roster degenerates to a horizon-only run
// =============================================================================

#[tokio::test]
async fn test_empty_roster_run_completes_with_only_the_system_entry() {
    let d = dispatcher_with(quick_cfg(), &[]);
    assert!(d.roster().is_empty());

    d.start(TARGET, Duration::from_millis(100)).expect("start");
    assert!(d.is_active(), "a run with nothing to launch still opens");

    d.wait_idle().await;
    let journal = d.journal();
    assert_eq!(journal.len(), 1, "no services, no task entries: {journal:#?}");
    assert_eq!(journal[0].kind, EventKind::RunCompleted);
    assert!(d.states().is_empty());
    assert!(!d.is_active());
}
