// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Where consumed samples and watchdog probe outcomes go.

use std::sync::{Mutex, PoisonError};

use crate::clock::Timestamp;
use crate::state::NavigationState;

/// One consumed snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub iteration: u32,
    pub state: NavigationState,
}

/// Outcome of one watchdog acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEvent {
    /// The lock was acquired (and released) within the timeout.
    Acquired { check: u32, at: Timestamp },
    /// The timeout elapsed before the lock could be acquired.
    NoData { check: u32, attempt: u32, at: Timestamp },
    /// The retry policy ran out of attempts for this check.
    GaveUp { check: u32, attempts: u32, at: Timestamp },
}

pub trait Sink: Send + Sync {
    fn on_sample(&self, sample: &Sample);

    fn on_probe(&self, _event: &ProbeEvent) {}
}

/// Emits everything as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn on_sample(&self, sample: &Sample) {
        let s = &sample.state;
        tracing::info!(
            target: "navsync::consumer",
            "execution {}: latitude={:.6} longitude={:.6} altitude={:.6} roll={:.6} pitch={:.6} yaw={:.6} timestamp={}",
            sample.iteration,
            s.latitude,
            s.longitude,
            s.altitude,
            s.roll,
            s.pitch,
            s.yaw,
            s.timestamp
        );
    }

    fn on_probe(&self, event: &ProbeEvent) {
        match event {
            ProbeEvent::Acquired { check, .. } => {
                tracing::debug!(target: "navsync::watchdog", "check {check}: resource acquired");
            }
            ProbeEvent::NoData { at, .. } => {
                tracing::warn!(target: "navsync::watchdog", "no data available at {at}");
            }
            ProbeEvent::GaveUp { check, attempts, .. } => {
                tracing::warn!(
                    target: "navsync::watchdog",
                    "check {check}: giving up after {attempts} timed out attempts"
                );
            }
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    samples: Mutex<Vec<Sample>>,
    probes: Mutex<Vec<ProbeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn probes(&self) -> Vec<ProbeEvent> {
        self.probes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Sink for RecordingSink {
    fn on_sample(&self, sample: &Sample) {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*sample);
    }

    fn on_probe(&self, event: &ProbeEvent) {
        self.probes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
    }
}
