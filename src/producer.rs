// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Periodic writer: recompute the navigation record, signal, sleep.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::Result;
use crate::state::{NavigationState, SharedState};
use crate::stop::StopToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    pub cycles: u64,
}

pub struct Producer {
    shared: Arc<SharedState>,
    clock: Arc<dyn Clock>,
    period: Duration,
    stop: StopToken,
}

impl Producer {
    pub fn new(shared: Arc<SharedState>, clock: Arc<dyn Clock>, period: Duration, stop: StopToken) -> Self {
        Self {
            shared,
            clock,
            period,
            stop,
        }
    }

    /// One update: capture the time, derive and publish the record, wake a
    /// waiting reader. All of it happens inside a single critical section.
    pub fn cycle(&self) -> io::Result<NavigationState> {
        let mut cs = self.shared.lock()?;
        let nav = NavigationState::at(self.clock.now());
        cs.publish(nav)?;
        Ok(nav)
    }

    /// Run until the reader marks the run complete or a stop is requested.
    ///
    /// The completion check is a lock-free read; a stale `false` costs at
    /// most one extra period. Sleeping happens outside the lock.
    pub fn run(self) -> Result<ProducerReport> {
        let mut report = ProducerReport::default();
        while !self.shared.is_complete() && !self.stop.is_stopped() {
            let nav = self.cycle()?;
            report.cycles += 1;
            tracing::trace!(cycle = report.cycles, timestamp = %nav.timestamp, "published");
            if !self.stop.sleep(self.period) {
                break;
            }
        }
        tracing::debug!(cycles = report.cycles, "producer stopped");
        Ok(report)
    }
}
