// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use std::time::Duration;

use navsync::{Backoff, Config, HandoffMode, NavError};

#[test]
fn defaults_match_reference_run() {
    let c = Config::default();
    assert_eq!(c.time_unit_ms, 1000);
    assert_eq!(c.producer.period_units, 1);
    assert_eq!(c.consumer.period_units, 10);
    assert_eq!(c.consumer.iterations, 18);
    assert_eq!(c.consumer.handoff, HandoffMode::Signal);
    assert!(c.watchdog.enabled);
    assert_eq!(c.watchdog.checks, 20);
    assert_eq!(c.units(c.watchdog.timeout_units), Duration::from_secs(10));
    assert_eq!(c.watchdog.retry.backoff, Backoff::Immediate);
    assert_eq!(c.watchdog.retry.max_attempts, None);
    c.validate().expect("valid");
}

#[test]
fn partial_toml_keeps_defaults() {
    let c = Config::from_toml_str(
        r#"
        time_unit_ms = 5

        [consumer]
        handoff = "poll"

        [watchdog.retry]
        max_attempts = 3
        backoff = { kind = "exponential", initial_ms = 1, max_ms = 8 }
        "#,
    )
    .expect("parse");

    assert_eq!(c.time_unit_ms, 5);
    assert_eq!(c.consumer.handoff, HandoffMode::Poll);
    assert_eq!(c.consumer.iterations, 18);
    assert_eq!(c.watchdog.retry.max_attempts, Some(3));
    assert_eq!(c.watchdog.retry.backoff, Backoff::Exponential { initial_ms: 1, max_ms: 8 });
    assert_eq!(c.units(10), Duration::from_millis(50));
}

#[test]
fn unknown_field_is_an_error() {
    let err = Config::from_toml_str("bogus = 1").unwrap_err();
    assert!(matches!(err, NavError::ConfigParse(_)));
}

#[test]
fn zero_period_is_invalid() {
    let err = Config::from_toml_str("[producer]\nperiod_units = 0").unwrap_err();
    assert!(matches!(err, NavError::InvalidConfig(ref m) if m.contains("producer.period_units")));
}
