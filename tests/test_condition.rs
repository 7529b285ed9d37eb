// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Condition: wake-one / wake-all handoff under a TimedMutex.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use navsync::{Condition, TimedMutex};

struct Shared {
    mtx: TimedMutex<u32>,
    cv: Condition,
}

fn shared() -> Arc<Shared> {
    Arc::new(Shared {
        mtx: TimedMutex::new(0).expect("mutex"),
        cv: Condition::new().expect("condition"),
    })
}

#[test]
fn notify_wakes_waiter() {
    let s = shared();
    let s2 = Arc::clone(&s);
    let waiter = thread::spawn(move || {
        let mut g = s2.mtx.lock().expect("lock");
        while *g == 0 {
            s2.cv.wait(&mut g).expect("wait");
        }
        *g
    });

    thread::sleep(Duration::from_millis(30));
    {
        let mut g = s.mtx.lock().expect("lock");
        *g = 42;
        s.cv.notify().expect("notify");
    }
    assert_eq!(waiter.join().unwrap(), 42);
}

#[test]
fn notify_without_waiter_is_lost() {
    let s = shared();
    s.cv.notify().expect("notify");
    s.cv.broadcast().expect("broadcast");

    let s2 = Arc::clone(&s);
    let waiter = thread::spawn(move || {
        let mut g = s2.mtx.lock().expect("lock");
        while *g == 0 {
            s2.cv.wait(&mut g).expect("wait");
        }
        *g
    });

    // Nothing remembers the earlier signals, so the waiter stays blocked.
    thread::sleep(Duration::from_millis(50));
    assert!(!waiter.is_finished());

    {
        let mut g = s.mtx.lock().expect("lock");
        *g = 7;
        s.cv.notify().expect("notify");
    }
    assert_eq!(waiter.join().unwrap(), 7);
}

#[test]
fn broadcast_wakes_all() {
    let s = shared();
    let woke = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let (s, woke) = (Arc::clone(&s), Arc::clone(&woke));
            thread::spawn(move || {
                let mut g = s.mtx.lock().expect("lock");
                while *g == 0 {
                    s.cv.wait(&mut g).expect("wait");
                }
                woke.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    {
        let mut g = s.mtx.lock().expect("lock");
        *g = 1;
        s.cv.broadcast().expect("broadcast");
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(woke.load(Ordering::SeqCst), 4);
}
