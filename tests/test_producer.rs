// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Producer: one critical section per cycle, sleep outside the lock.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use navsync::{ManualClock, NavigationState, Producer, SharedState, StopToken, Timestamp};

fn shared() -> Arc<SharedState> {
    Arc::new(SharedState::new(NavigationState::initial(Timestamp::default())).expect("state"))
}

#[test]
fn cycle_publishes_the_clock_reading() {
    let shared = shared();
    let clock = Arc::new(ManualClock::new(0));
    let producer = Producer::new(
        Arc::clone(&shared),
        clock.clone(),
        Duration::from_millis(1),
        StopToken::new(),
    );

    clock.set(1_700_000_042);
    let nav = producer.cycle().expect("cycle");
    assert_eq!(nav.timestamp, Timestamp::new(1_700_000_042, 0));
    assert_eq!(nav.latitude, 0.01 * 1_700_000_042.0);

    let cs = shared.lock().expect("lock");
    assert_eq!(cs.snapshot(), nav);
    assert_eq!(cs.generation(), 1);
}

#[test]
fn producer_sleeps_outside_the_lock() {
    let shared = shared();
    let stop = StopToken::new();
    let producer = Producer::new(
        Arc::clone(&shared),
        Arc::new(ManualClock::new(1_700_000_000)),
        Duration::from_millis(200),
        stop.clone(),
    );
    let handle = thread::spawn(move || producer.run());

    let deadline = Instant::now() + Duration::from_secs(2);
    while shared.lock().expect("lock").generation() == 0 {
        assert!(Instant::now() < deadline, "first publish never happened");
        thread::sleep(Duration::from_millis(1));
    }

    // The producer is inside its 200 ms period now; the lock must be free.
    assert!(shared.probe(Duration::from_millis(1)).expect("timed lock"));
    assert_eq!(shared.lock().expect("lock").generation(), 1);

    stop.stop();
    let report = handle.join().unwrap().expect("run");
    assert_eq!(report.cycles, 1);
}

#[test]
fn completed_run_publishes_nothing() {
    let shared = shared();
    assert!(shared.lock().expect("lock").mark_complete());

    let producer = Producer::new(
        Arc::clone(&shared),
        Arc::new(ManualClock::new(1)),
        Duration::from_millis(1),
        StopToken::new(),
    );
    let report = producer.run().expect("run");
    assert_eq!(report.cycles, 0);
    assert_eq!(shared.lock().expect("lock").generation(), 0);
}
