// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Run parameters. Defaults reproduce the reference run: 1 s time unit,
// 1 Hz producer, 0.1 Hz consumer for 18 reads, 20 watchdog checks with a
// 10 s acquisition timeout.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::backoff::RetryPolicy;
use crate::error::{NavError, Result};

/// Names a TOML file to load instead of the defaults.
pub const CONFIG_ENV: &str = "NAVSYNC_CONFIG";
/// Overrides `time_unit_ms` after the file is loaded.
pub const TIME_UNIT_ENV: &str = "NAVSYNC_TIME_UNIT_MS";

/// How the consumer learns that a new sample is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffMode {
    /// Block on the condition variable until the producer signals.
    #[default]
    Signal,
    /// Read whatever the record holds on each period, without waiting.
    Poll,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProducerConfig {
    pub period_units: u32,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self { period_units: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumerConfig {
    pub period_units: u32,
    pub iterations: u32,
    pub handoff: HandoffMode,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            period_units: 10,
            iterations: 18,
            handoff: HandoffMode::Signal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchdogConfig {
    pub enabled: bool,
    pub checks: u32,
    pub timeout_units: u32,
    pub period_units: u32,
    pub retry: RetryPolicy,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            checks: 20,
            timeout_units: 10,
            period_units: 10,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Length of one time unit in milliseconds.
    pub time_unit_ms: u64,
    /// Request SCHED_FIFO for the worker threads (needs CAP_SYS_NICE).
    pub realtime_priority: bool,
    pub producer: ProducerConfig,
    pub consumer: ConsumerConfig,
    pub watchdog: WatchdogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_unit_ms: 1000,
            realtime_priority: false,
            producer: ProducerConfig::default(),
            consumer: ConsumerConfig::default(),
            watchdog: WatchdogConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| NavError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults, or the file named by `NAVSYNC_CONFIG`, then the
    /// `NAVSYNC_TIME_UNIT_MS` override.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(raw) = std::env::var(TIME_UNIT_ENV) {
            config.time_unit_ms = raw.trim().parse().map_err(|_| {
                NavError::InvalidConfig(format!("{TIME_UNIT_ENV}={raw:?} is not a number of milliseconds"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut bad = Vec::new();
        if self.time_unit_ms == 0 {
            bad.push("time_unit_ms");
        }
        if self.producer.period_units == 0 {
            bad.push("producer.period_units");
        }
        if self.consumer.period_units == 0 {
            bad.push("consumer.period_units");
        }
        if self.consumer.iterations == 0 {
            bad.push("consumer.iterations");
        }
        if self.watchdog.enabled && self.watchdog.timeout_units == 0 {
            bad.push("watchdog.timeout_units");
        }
        if self.watchdog.retry.max_attempts == Some(0) {
            bad.push("watchdog.retry.max_attempts");
        }
        if bad.is_empty() {
            Ok(())
        } else {
            Err(NavError::InvalidConfig(format!("must be non-zero: {}", bad.join(", "))))
        }
    }

    /// `n` time units as a duration.
    pub fn units(&self, n: u32) -> Duration {
        Duration::from_millis(self.time_unit_ms.saturating_mul(n as u64))
    }
}
