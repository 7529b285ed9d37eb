// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Time sources for the producer's timestamps and the watchdog's reports.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Wall-clock instant: whole seconds plus the sub-second part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub secs: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub const fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// CLOCK_REALTIME.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts) };
        Timestamp::new(ts.tv_sec as i64, ts.tv_nsec as u32)
    }
}

/// Deterministic clock for tests.
///
/// Every `now()` returns the current second and then advances by `step`.
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
    step: i64,
}

impl ManualClock {
    /// A clock frozen at `secs`.
    pub fn new(secs: i64) -> Self {
        Self::stepping(secs, 0)
    }

    /// A clock starting at `secs` that moves forward `step` seconds per read.
    pub fn stepping(secs: i64, step: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
            step,
        }
    }

    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.fetch_add(self.step, Ordering::SeqCst), 0)
    }
}
