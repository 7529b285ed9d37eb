// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX mutex and condition variable primitives.
// Process-private pthread_mutex_t / pthread_cond_t kept at a stable heap
// address for the lifetime of the owning handle.

use std::cell::UnsafeCell;
use std::io;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Deadline helpers
// ---------------------------------------------------------------------------

/// Absolute CLOCK_REALTIME deadline `timeout` from now, as the timespec
/// expected by `pthread_mutex_timedlock`.
#[cfg(not(target_os = "macos"))]
fn realtime_deadline(timeout: Duration) -> libc::timespec {
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts) };
    let ns_total = ts.tv_nsec as u64 + timeout.subsec_nanos() as u64;
    ts.tv_sec += timeout.as_secs() as libc::time_t + (ns_total / 1_000_000_000) as libc::time_t;
    ts.tv_nsec = (ns_total % 1_000_000_000) as libc::c_long;
    ts
}

fn check(eno: libc::c_int) -> io::Result<()> {
    if eno != 0 {
        return Err(io::Error::from_raw_os_error(eno));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PlatformMutex
// ---------------------------------------------------------------------------

pub struct PlatformMutex {
    raw: Box<UnsafeCell<libc::pthread_mutex_t>>,
}

// Safety: pthread mutexes are designed for concurrent access and the boxed
// storage never moves while the handle is alive.
unsafe impl Send for PlatformMutex {}
unsafe impl Sync for PlatformMutex {}

impl PlatformMutex {
    /// Initialise a new error-checking mutex.
    ///
    /// Error-checking turns a relock by the owner into `EDEADLK` and an unlock
    /// by a non-owner into `EPERM` instead of undefined behaviour.
    pub fn new() -> io::Result<Self> {
        let raw: Box<UnsafeCell<libc::pthread_mutex_t>> =
            Box::new(UnsafeCell::new(unsafe { std::mem::zeroed() }));
        unsafe {
            let mut attr: libc::pthread_mutexattr_t = std::mem::zeroed();
            check(libc::pthread_mutexattr_init(&mut attr))?;

            let eno = libc::pthread_mutexattr_settype(&mut attr, libc::PTHREAD_MUTEX_ERRORCHECK);
            if eno != 0 {
                libc::pthread_mutexattr_destroy(&mut attr);
                return Err(io::Error::from_raw_os_error(eno));
            }

            let eno = libc::pthread_mutex_init(raw.get(), &attr);
            libc::pthread_mutexattr_destroy(&mut attr);
            check(eno)?;
        }
        Ok(Self { raw })
    }

    pub(crate) fn as_ptr(&self) -> *mut libc::pthread_mutex_t {
        self.raw.get()
    }

    /// Lock the mutex (blocking).
    pub fn lock(&self) -> io::Result<()> {
        check(unsafe { libc::pthread_mutex_lock(self.as_ptr()) })
    }

    /// Lock the mutex, giving up once `timeout` has elapsed.
    /// Returns `Ok(true)` if acquired, `Ok(false)` on timeout.
    pub fn lock_timeout(&self, timeout: Duration) -> io::Result<bool> {
        #[cfg(target_os = "macos")]
        {
            // macOS lacks pthread_mutex_timedlock; emulate via try_lock polling.
            let deadline = std::time::Instant::now() + timeout;
            let mut k = 0u32;
            loop {
                if self.try_lock()? {
                    return Ok(true);
                }
                if std::time::Instant::now() >= deadline {
                    return Ok(false);
                }
                crate::backoff::adaptive_yield(&mut k);
            }
        }
        #[cfg(not(target_os = "macos"))]
        {
            extern "C" {
                fn pthread_mutex_timedlock(
                    mutex: *mut libc::pthread_mutex_t,
                    abstime: *const libc::timespec,
                ) -> libc::c_int;
            }
            let ts = realtime_deadline(timeout);
            loop {
                let eno = unsafe { pthread_mutex_timedlock(self.as_ptr(), &ts) };
                match eno {
                    0 => return Ok(true),
                    libc::ETIMEDOUT => return Ok(false),
                    libc::EINTR => continue,
                    _ => return Err(io::Error::from_raw_os_error(eno)),
                }
            }
        }
    }

    /// Try to lock the mutex without blocking.
    pub fn try_lock(&self) -> io::Result<bool> {
        let eno = unsafe { libc::pthread_mutex_trylock(self.as_ptr()) };
        match eno {
            0 => Ok(true),
            libc::EBUSY => Ok(false),
            _ => Err(io::Error::from_raw_os_error(eno)),
        }
    }

    /// Unlock the mutex.
    pub fn unlock(&self) -> io::Result<()> {
        check(unsafe { libc::pthread_mutex_unlock(self.as_ptr()) })
    }
}

impl Drop for PlatformMutex {
    fn drop(&mut self) {
        // Every guard borrows the handle, so nobody can hold the lock here.
        unsafe { libc::pthread_mutex_destroy(self.as_ptr()) };
    }
}

// ---------------------------------------------------------------------------
// PlatformCondition
// ---------------------------------------------------------------------------

pub struct PlatformCondition {
    raw: Box<UnsafeCell<libc::pthread_cond_t>>,
}

// Safety: see PlatformMutex.
unsafe impl Send for PlatformCondition {}
unsafe impl Sync for PlatformCondition {}

impl PlatformCondition {
    /// Initialise a condition variable on the default (realtime) clock.
    pub fn new() -> io::Result<Self> {
        let raw: Box<UnsafeCell<libc::pthread_cond_t>> =
            Box::new(UnsafeCell::new(unsafe { std::mem::zeroed() }));
        check(unsafe { libc::pthread_cond_init(raw.get(), std::ptr::null()) })?;
        Ok(Self { raw })
    }

    fn as_ptr(&self) -> *mut libc::pthread_cond_t {
        self.raw.get()
    }

    /// Wait on the condition. The caller must hold `mtx` locked; it is
    /// atomically released and re-acquired around the wait.
    pub fn wait(&self, mtx: &PlatformMutex) -> io::Result<()> {
        check(unsafe { libc::pthread_cond_wait(self.as_ptr(), mtx.as_ptr()) })
    }

    /// Wake one waiter.
    pub fn notify(&self) -> io::Result<()> {
        check(unsafe { libc::pthread_cond_signal(self.as_ptr()) })
    }

    /// Wake all waiters.
    pub fn broadcast(&self) -> io::Result<()> {
        check(unsafe { libc::pthread_cond_broadcast(self.as_ptr()) })
    }
}

impl Drop for PlatformCondition {
    fn drop(&mut self) {
        unsafe { libc::pthread_cond_destroy(self.as_ptr()) };
    }
}
