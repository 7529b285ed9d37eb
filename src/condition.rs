// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Condition variable bound to a TimedMutex guard.
// POSIX: process-private pthread_cond_t.

use std::io;

use crate::mutex::MutexGuard;
use crate::platform::PlatformCondition;

/// A condition variable.
///
/// Waiting requires the guard of the mutex it is used with, so a wait
/// outside the critical section does not type-check. A notification with no
/// thread waiting is lost; nothing remembers it.
pub struct Condition {
    inner: PlatformCondition,
}

impl Condition {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            inner: PlatformCondition::new()?,
        })
    }

    /// Wait on the condition variable.
    /// The guard's mutex is atomically released and re-acquired around the
    /// wait. May return spuriously; callers re-check their predicate.
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) -> io::Result<()> {
        self.inner.wait(guard.mutex().platform())
    }

    /// Wake one waiter.
    pub fn notify(&self) -> io::Result<()> {
        self.inner.notify()
    }

    /// Wake all waiters.
    pub fn broadcast(&self) -> io::Result<()> {
        self.inner.broadcast()
    }
}
