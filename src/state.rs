// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// The shared navigation record, its lock, the "fresh sample" condition
// variable and the run-completion flag.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::clock::Timestamp;
use crate::condition::Condition;
use crate::error::{NavError, Result};
use crate::mutex::{MutexGuard, TimedMutex};
use crate::stop::StopToken;

/// Value of π used by the attitude formulas. The reference run was produced
/// with this two-digit approximation and the outputs must match it exactly.
#[allow(clippy::approx_constant)]
pub const ANGLE_PI: f64 = 3.14;

/// Position and attitude at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigationState {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub timestamp: Timestamp,
}

impl NavigationState {
    /// All-zero state stamped with `timestamp`; what the record holds before
    /// the first update.
    pub fn initial(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// State derived from the whole-second part of `timestamp`.
    pub fn at(timestamp: Timestamp) -> Self {
        let t = timestamp.secs as f64;
        Self {
            latitude: 0.01 * t,
            longitude: 0.2 * t,
            altitude: 0.25 * t,
            roll: (2.0 * ANGLE_PI * t).sin(),
            pitch: (2.0 * ANGLE_PI * t * t).cos(),
            yaw: (2.0 * ANGLE_PI * t).cos(),
            timestamp,
        }
    }

    /// Whether every field was derived from this record's own timestamp.
    pub fn is_consistent(&self) -> bool {
        *self == Self::at(self.timestamp)
    }
}

struct Record {
    nav: NavigationState,
    // Bumped on every publish; lets a waiter tell a real publish from a
    // spurious wake-up without remembering signals nobody waited for.
    generation: u64,
}

/// The single shared resource: record + completion flag under one lock.
pub struct SharedState {
    record: TimedMutex<Record>,
    fresh: Condition,
    complete: AtomicBool,
}

impl SharedState {
    pub fn new(initial: NavigationState) -> Result<Self> {
        let record = TimedMutex::new(Record {
            nav: initial,
            generation: 0,
        })
        .map_err(|source| NavError::Init {
            primitive: "mutex",
            source,
        })?;
        let fresh = Condition::new().map_err(|source| NavError::Init {
            primitive: "condition variable",
            source,
        })?;
        Ok(Self {
            record,
            fresh,
            complete: AtomicBool::new(false),
        })
    }

    /// Enter the critical section (blocking).
    pub fn lock(&self) -> io::Result<CriticalSection<'_>> {
        Ok(CriticalSection {
            guard: self.record.lock()?,
            shared: self,
        })
    }

    /// Lock-free read of the completion flag. May lag the write by one
    /// reader iteration.
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Acquire and immediately release the lock, waiting at most `timeout`.
    /// Returns `Ok(false)` if the deadline passed first. Never touches the
    /// record.
    pub fn probe(&self, timeout: Duration) -> io::Result<bool> {
        Ok(self.record.lock_timeout(timeout)?.is_some())
    }

    /// Wake every thread blocked waiting for a publish so it can observe a
    /// stop request.
    pub fn wake_all(&self) -> io::Result<()> {
        let _g = self.record.lock()?;
        self.fresh.broadcast()
    }
}

/// Exclusive access to the shared record. Released on drop.
pub struct CriticalSection<'a> {
    guard: MutexGuard<'a, Record>,
    shared: &'a SharedState,
}

impl CriticalSection<'_> {
    pub fn snapshot(&self) -> NavigationState {
        self.guard.nav
    }

    pub fn generation(&self) -> u64 {
        self.guard.generation
    }

    /// Overwrite the record and wake one waiting reader, if any.
    pub fn publish(&mut self, nav: NavigationState) -> io::Result<()> {
        self.guard.nav = nav;
        self.guard.generation += 1;
        self.shared.fresh.notify()
    }

    /// Block until a publish that happens after this call, or until `stop`
    /// is requested. Returns `Ok(false)` when stopped.
    ///
    /// Publishes made before the call do not count: a signal sent while
    /// nobody waited is lost.
    pub fn wait_for_publish(&mut self, stop: &StopToken) -> io::Result<bool> {
        let seen = self.guard.generation;
        while self.guard.generation == seen {
            if stop.is_stopped() {
                return Ok(false);
            }
            self.shared.fresh.wait(&mut self.guard)?;
        }
        Ok(true)
    }

    /// Set the completion flag. Returns `true` only for the call that moved
    /// it from false to true.
    pub fn mark_complete(&mut self) -> bool {
        !self.shared.complete.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulas_use_whole_seconds() {
        let nav = NavigationState::at(Timestamp::new(100, 999_999_999));
        assert_eq!(nav.latitude, 0.01 * 100.0);
        assert_eq!(nav.longitude, 0.2 * 100.0);
        assert_eq!(nav.altitude, 0.25 * 100.0);
        assert_eq!(nav.roll, (2.0 * 3.14 * 100.0f64).sin());
        assert_eq!(nav.pitch, (2.0 * 3.14 * 100.0f64 * 100.0).cos());
        assert_eq!(nav.yaw, (2.0 * 3.14 * 100.0f64).cos());
        assert!(nav.is_consistent());
    }

    #[test]
    fn initial_state_is_zeroed() {
        let nav = NavigationState::initial(Timestamp::new(7, 0));
        assert_eq!(nav.latitude, 0.0);
        assert_eq!(nav.yaw, 0.0);
        assert_eq!(nav.timestamp.secs, 7);
    }

    #[test]
    fn completion_flag_flips_once() {
        let shared = SharedState::new(NavigationState::default()).expect("shared");
        assert!(!shared.is_complete());
        let mut cs = shared.lock().expect("lock");
        assert!(cs.mark_complete());
        assert!(!cs.mark_complete());
        drop(cs);
        assert!(shared.is_complete());
    }
}
