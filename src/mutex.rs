// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Data-carrying mutex with blocking, non-blocking and time-bounded acquisition.
// Delegates to platform::PlatformMutex.

use std::cell::UnsafeCell;
use std::io;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::platform::PlatformMutex;

/// A mutex that owns the data it protects.
///
/// The data is only reachable through a [`MutexGuard`], so every read or
/// write happens inside one critical section.
pub struct TimedMutex<T> {
    inner: PlatformMutex,
    data: UnsafeCell<T>,
}

// Safety: access to `data` is serialised by `inner`.
unsafe impl<T: Send> Send for TimedMutex<T> {}
unsafe impl<T: Send> Sync for TimedMutex<T> {}

impl<T> TimedMutex<T> {
    /// Initialise the underlying pthread mutex around `value`.
    pub fn new(value: T) -> io::Result<Self> {
        Ok(Self {
            inner: PlatformMutex::new()?,
            data: UnsafeCell::new(value),
        })
    }

    /// Lock the mutex (blocking, infinite timeout).
    pub fn lock(&self) -> io::Result<MutexGuard<'_, T>> {
        self.inner.lock()?;
        Ok(self.guard())
    }

    /// Lock the mutex with a timeout.
    /// Returns `Ok(None)` if `timeout` elapsed first; nothing is held then.
    pub fn lock_timeout(&self, timeout: Duration) -> io::Result<Option<MutexGuard<'_, T>>> {
        if self.inner.lock_timeout(timeout)? {
            Ok(Some(self.guard()))
        } else {
            Ok(None)
        }
    }

    /// Try to lock the mutex without blocking.
    pub fn try_lock(&self) -> io::Result<Option<MutexGuard<'_, T>>> {
        if self.inner.try_lock()? {
            Ok(Some(self.guard()))
        } else {
            Ok(None)
        }
    }

    fn guard(&self) -> MutexGuard<'_, T> {
        MutexGuard {
            mtx: self,
            _not_send: PhantomData,
        }
    }

    pub(crate) fn platform(&self) -> &PlatformMutex {
        &self.inner
    }
}

/// RAII guard: the critical section. Unlocks on drop.
///
/// Not `Send`: a pthread mutex must be unlocked by the thread that locked it.
pub struct MutexGuard<'a, T> {
    mtx: &'a TimedMutex<T>,
    _not_send: PhantomData<*const ()>,
}

impl<'a, T> MutexGuard<'a, T> {
    pub(crate) fn mutex(&self) -> &'a TimedMutex<T> {
        self.mtx
    }
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.mtx.data.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mtx.data.get() }
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.mtx.inner.unlock() {
            tracing::error!("mutex unlock failed: {e}");
        }
    }
}
