// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Liveness probe: periodically checks that the shared lock can be taken
// within a bounded wait. Never reads or writes the navigation record.

use std::sync::Arc;
use std::time::Duration;

use crate::backoff::RetryPolicy;
use crate::clock::Clock;
use crate::error::Result;
use crate::sink::{ProbeEvent, Sink};
use crate::state::SharedState;
use crate::stop::StopToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchdogReport {
    /// Checks that acquired the lock.
    pub acquired: u32,
    /// Timed acquisitions that expired.
    pub timeouts: u32,
    /// Checks abandoned because the retry policy ran out of attempts.
    pub gave_up: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct WatchdogSettings {
    pub checks: u32,
    pub timeout: Duration,
    pub period: Duration,
    pub retry: RetryPolicy,
}

pub struct Watchdog {
    shared: Arc<SharedState>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn Sink>,
    settings: WatchdogSettings,
    stop: StopToken,
}

impl Watchdog {
    pub fn new(
        shared: Arc<SharedState>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn Sink>,
        settings: WatchdogSettings,
        stop: StopToken,
    ) -> Self {
        Self {
            shared,
            clock,
            sink,
            settings,
            stop,
        }
    }

    /// Run `checks` probes, `period` apart.
    ///
    /// Each probe retries timed acquisitions per the retry policy. With no
    /// attempt limit a lock that is never released keeps the probe retrying
    /// until a stop is requested.
    pub fn run(self) -> Result<WatchdogReport> {
        let mut report = WatchdogReport::default();
        'checks: for check in 0..self.settings.checks {
            let mut failures = 0u32;
            loop {
                if self.stop.is_stopped() {
                    break 'checks;
                }
                if self.shared.probe(self.settings.timeout)? {
                    report.acquired += 1;
                    self.sink.on_probe(&ProbeEvent::Acquired {
                        check,
                        at: self.clock.now(),
                    });
                    break;
                }

                failures += 1;
                report.timeouts += 1;
                self.sink.on_probe(&ProbeEvent::NoData {
                    check,
                    attempt: failures,
                    at: self.clock.now(),
                });
                if !self.settings.retry.allows_retry(failures) {
                    report.gave_up += 1;
                    self.sink.on_probe(&ProbeEvent::GaveUp {
                        check,
                        attempts: failures,
                        at: self.clock.now(),
                    });
                    break;
                }
                if !self.stop.sleep(self.settings.retry.delay(failures)) {
                    break 'checks;
                }
            }
            if !self.stop.sleep(self.settings.period) {
                break;
            }
        }
        tracing::debug!(
            acquired = report.acquired,
            timeouts = report.timeouts,
            gave_up = report.gave_up,
            "watchdog stopped"
        );
        Ok(report)
    }
}
