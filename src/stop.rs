// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Shared cancellation flag with an interruptible sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct Inner {
    stopped: AtomicBool,
    lock: Mutex<()>,
    cv: Condvar,
}

/// Cloneable stop request shared by every component of a run.
///
/// Requesting a stop wakes all sleepers. It does not wake a thread blocked
/// on the shared state's condition variable; see `SharedState::wake_all`.
#[derive(Clone, Default)]
pub struct StopToken {
    inner: Arc<Inner>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::Release);
        let _g = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.cv.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Sleep for `dur` unless a stop is requested first.
    /// Returns `false` if the token is stopped (before or during the sleep).
    pub fn sleep(&self, dur: Duration) -> bool {
        if dur.is_zero() {
            return !self.is_stopped();
        }
        let g = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _g = self
            .inner
            .cv
            .wait_timeout_while(g, dur, |_| !self.is_stopped())
            .unwrap_or_else(PoisonError::into_inner);
        !self.is_stopped()
    }
}

impl std::fmt::Debug for StopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopToken")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
