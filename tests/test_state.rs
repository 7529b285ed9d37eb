// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Shared navigation record: formulas, atomic snapshots, publish handoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use navsync::state::ANGLE_PI;
use navsync::{NavigationState, SharedState, StopToken, Timestamp};

proptest! {
    #[test]
    fn record_follows_formulas(secs in 0i64..4_000_000_000, nanos in 0u32..1_000_000_000) {
        let nav = NavigationState::at(Timestamp::new(secs, nanos));
        let t = secs as f64;
        prop_assert_eq!(nav.latitude, 0.01 * t);
        prop_assert_eq!(nav.longitude, 0.2 * t);
        prop_assert_eq!(nav.altitude, 0.25 * t);
        prop_assert_eq!(nav.roll, (2.0 * ANGLE_PI * t).sin());
        prop_assert_eq!(nav.pitch, (2.0 * ANGLE_PI * t * t).cos());
        prop_assert_eq!(nav.yaw, (2.0 * ANGLE_PI * t).cos());
        prop_assert_eq!(nav.timestamp, Timestamp::new(secs, nanos));
    }
}

#[test]
fn sub_second_part_does_not_change_fields() {
    let a = NavigationState::at(Timestamp::new(1_700_000_000, 0));
    let b = NavigationState::at(Timestamp::new(1_700_000_000, 999_000_000));
    assert_eq!(a.latitude, b.latitude);
    assert_eq!(a.pitch, b.pitch);
    assert_eq!(a.latitude, 0.01 * 1_700_000_000.0);
}

#[test]
fn snapshots_never_mix_updates() {
    let shared = Arc::new(SharedState::new(NavigationState::at(Timestamp::new(0, 0))).expect("shared"));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let (shared, done) = (Arc::clone(&shared), Arc::clone(&done));
        thread::spawn(move || {
            let mut secs = 1i64;
            while !done.load(Ordering::Relaxed) {
                let mut cs = shared.lock().expect("lock");
                cs.publish(NavigationState::at(Timestamp::new(secs, 0))).expect("publish");
                secs += 1;
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..2000 {
                    let snap = shared.lock().expect("lock").snapshot();
                    assert!(snap.is_consistent(), "torn snapshot: {snap:?}");
                }
            })
        })
        .collect();

    for r in readers {
        r.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}

#[test]
fn wait_returns_after_publish() {
    let shared = Arc::new(SharedState::new(NavigationState::default()).expect("shared"));
    let stop = StopToken::new();

    let reader = {
        let (shared, stop) = (Arc::clone(&shared), stop.clone());
        thread::spawn(move || {
            let mut cs = shared.lock().expect("lock");
            assert!(cs.wait_for_publish(&stop).expect("wait"));
            cs.snapshot()
        })
    };

    // Keep publishing until the reader has caught one.
    let expected = NavigationState::at(Timestamp::new(5, 0));
    while !reader.is_finished() {
        shared.lock().expect("lock").publish(expected).expect("publish");
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(reader.join().unwrap(), expected);
}

#[test]
fn publish_before_wait_is_not_remembered() {
    let shared = Arc::new(SharedState::new(NavigationState::default()).expect("shared"));
    shared
        .lock()
        .expect("lock")
        .publish(NavigationState::at(Timestamp::new(1, 0)))
        .expect("publish");

    let stop = StopToken::new();
    let stopper = {
        let (shared, stop) = (Arc::clone(&shared), stop.clone());
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            stop.stop();
            shared.wake_all().expect("wake_all");
        })
    };

    // The earlier publish does not satisfy the wait; only the stop ends it.
    let mut cs = shared.lock().expect("lock");
    assert!(!cs.wait_for_publish(&stop).expect("wait"));
    assert_eq!(cs.generation(), 1);
    drop(cs);
    stopper.join().unwrap();
}

#[test]
fn wake_all_releases_stopped_waiter() {
    let shared = Arc::new(SharedState::new(NavigationState::default()).expect("shared"));
    let stop = StopToken::new();

    let reader = {
        let (shared, stop) = (Arc::clone(&shared), stop.clone());
        thread::spawn(move || {
            let mut cs = shared.lock().expect("lock");
            cs.wait_for_publish(&stop).expect("wait")
        })
    };

    thread::sleep(Duration::from_millis(30));
    stop.stop();
    shared.wake_all().expect("wake_all");
    assert!(!reader.join().unwrap());
}

#[test]
fn probe_does_not_touch_record() {
    let initial = NavigationState::at(Timestamp::new(9, 0));
    let shared = SharedState::new(initial).expect("shared");
    assert!(shared.probe(Duration::from_millis(10)).expect("probe"));
    let cs = shared.lock().expect("lock");
    assert_eq!(cs.snapshot(), initial);
    assert_eq!(cs.generation(), 0);
}
