// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Periodic navigation-state producer/consumer with condition-variable handoff
// and a timed-lock watchdog, on POSIX mutex / condition variable primitives.

mod platform;

pub mod backoff;
pub use backoff::{Backoff, RetryPolicy};

mod mutex;
pub use mutex::{MutexGuard, TimedMutex};

mod condition;
pub use condition::Condition;

pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};

mod error;
pub use error::{NavError, Result};

pub mod config;
pub use config::{Config, HandoffMode};

mod stop;
pub use stop::StopToken;

pub mod state;
pub use state::{CriticalSection, NavigationState, SharedState};

pub mod sink;
pub use sink::{LogSink, ProbeEvent, RecordingSink, Sample, Sink};

pub mod producer;
pub use producer::{Producer, ProducerReport};

pub mod consumer;
pub use consumer::{Consumer, ConsumerReport};

pub mod watchdog;
pub use watchdog::{Watchdog, WatchdogReport, WatchdogSettings};

pub mod rt_prio;

mod coordinator;
pub use coordinator::{Coordinator, RunReport, RunningSystem, StopHandle};
