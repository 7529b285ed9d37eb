// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Retry pacing: the adaptive pause → yield → sleep ladder used by polled lock
// emulation, and the caller-chosen retry policy applied after a timed lock
// acquisition expires.

use std::time::Duration;

use serde::Deserialize;

/// Adaptive backoff ladder.
///
/// - k < 4:  busy spin (do nothing)
/// - k < 16: CPU pause hint
/// - k < 32: thread yield
/// - k >= 32: sleep 1ms
#[inline]
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn adaptive_yield(k: &mut u32) {
    if *k < 4 {
        // busy spin
    } else if *k < 16 {
        std::hint::spin_loop();
    } else if *k < 32 {
        std::thread::yield_now();
    } else {
        std::thread::sleep(Duration::from_millis(1));
        return;
    }
    *k += 1;
}

/// Pause inserted between two timed acquisition attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backoff {
    /// Retry straight away. The timed acquisition itself already waited for
    /// the full timeout, so this never spins on a free CPU.
    Immediate,
    /// Same pause after every failed attempt.
    Fixed { delay_ms: u64 },
    /// Doubles after every failed attempt, capped at `max_ms`.
    Exponential { initial_ms: u64, max_ms: u64 },
}

impl Backoff {
    /// Pause after the `failures`-th consecutive failed attempt (1-based).
    pub fn delay(&self, failures: u32) -> Duration {
        match *self {
            Backoff::Immediate => Duration::ZERO,
            Backoff::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Backoff::Exponential { initial_ms, max_ms } => {
                let shift = failures.saturating_sub(1).min(32);
                let ms = initial_ms.saturating_mul(1u64 << shift).min(max_ms);
                Duration::from_millis(ms)
            }
        }
    }
}

/// What to do when a bounded-wait acquisition times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub backoff: Backoff,
    /// `None` keeps retrying until the lock is acquired or a stop is requested.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Backoff::Immediate,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `failures` consecutive timeouts.
    pub fn allows_retry(&self, failures: u32) -> bool {
        match self.max_attempts {
            Some(max) => failures < max,
            None => true,
        }
    }

    pub fn delay(&self, failures: u32) -> Duration {
        self.backoff.delay(failures)
    }
}
