// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Periodic reader: wait for a fresh sample, emit one consistent snapshot,
// sleep; mark the run complete after a fixed number of reads.

use std::sync::Arc;
use std::time::Duration;

use crate::config::HandoffMode;
use crate::error::Result;
use crate::sink::{Sample, Sink};
use crate::state::SharedState;
use crate::stop::StopToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Snapshots emitted.
    pub consumed: u32,
    /// Whether this reader set the completion flag.
    pub completed: bool,
}

pub struct Consumer {
    shared: Arc<SharedState>,
    sink: Arc<dyn Sink>,
    iterations: u32,
    period: Duration,
    handoff: HandoffMode,
    stop: StopToken,
}

impl Consumer {
    pub fn new(
        shared: Arc<SharedState>,
        sink: Arc<dyn Sink>,
        iterations: u32,
        period: Duration,
        handoff: HandoffMode,
        stop: StopToken,
    ) -> Self {
        Self {
            shared,
            sink,
            iterations,
            period,
            handoff,
            stop,
        }
    }

    /// Read `iterations` snapshots, then set the completion flag.
    ///
    /// Updates published while this thread sleeps are overwritten and never
    /// seen. A stop request ends the run early without setting the flag.
    pub fn run(self) -> Result<ConsumerReport> {
        let mut report = ConsumerReport::default();
        for iteration in 0..self.iterations {
            {
                let mut cs = self.shared.lock()?;
                let fresh = match self.handoff {
                    HandoffMode::Signal => cs.wait_for_publish(&self.stop)?,
                    HandoffMode::Poll => !self.stop.is_stopped(),
                };
                if !fresh {
                    break;
                }
                let sample = Sample {
                    iteration,
                    state: cs.snapshot(),
                };
                self.sink.on_sample(&sample);
                report.consumed += 1;
            }
            if !self.stop.sleep(self.period) {
                break;
            }
        }

        if report.consumed == self.iterations {
            let mut cs = self.shared.lock()?;
            report.completed = cs.mark_complete();
            tracing::info!(consumed = report.consumed, "run complete");
        } else {
            tracing::info!(consumed = report.consumed, "consumer stopped before completing");
        }
        Ok(report)
    }
}
