// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Composition root: builds the shared state, starts producer, consumer and
// watchdog threads, and joins them.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::consumer::{Consumer, ConsumerReport};
use crate::error::{NavError, Result};
use crate::producer::{Producer, ProducerReport};
use crate::rt_prio;
use crate::sink::{LogSink, Sink};
use crate::state::{NavigationState, SharedState};
use crate::stop::StopToken;
use crate::watchdog::{Watchdog, WatchdogReport, WatchdogSettings};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub producer: ProducerReport,
    pub consumer: ConsumerReport,
    pub watchdog: Option<WatchdogReport>,
}

pub struct Coordinator {
    config: Config,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn Sink>,
}

impl Coordinator {
    /// Wall clock and log output.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    /// Start and wait for every thread to finish.
    pub fn run(self) -> Result<RunReport> {
        self.start()?.join()
    }

    /// Create the shared state and spawn the worker threads.
    ///
    /// Failing to create a primitive or a thread stops anything already
    /// started and returns the error.
    pub fn start(self) -> Result<RunningSystem> {
        let config = self.config;
        config.validate()?;

        let shared = Arc::new(SharedState::new(NavigationState::initial(self.clock.now()))?);
        let stop = StopToken::new();
        let rt = config.realtime_priority;

        let producer = Producer::new(
            Arc::clone(&shared),
            Arc::clone(&self.clock),
            config.units(config.producer.period_units),
            stop.clone(),
        );
        let priority = rt.then_some(rt_prio::PRODUCER_PRIORITY);
        let producer = spawn_worker("producer", priority, &shared, &stop, move || producer.run())?;

        let consumer = Consumer::new(
            Arc::clone(&shared),
            Arc::clone(&self.sink),
            config.consumer.iterations,
            config.units(config.consumer.period_units),
            config.consumer.handoff,
            stop.clone(),
        );
        let priority = rt.then_some(rt_prio::CONSUMER_PRIORITY);
        let consumer = match spawn_worker("consumer", priority, &shared, &stop, move || consumer.run()) {
            Ok(h) => h,
            Err(e) => {
                abort_started(&shared, &stop, producer);
                return Err(e);
            }
        };

        let watchdog = if config.watchdog.enabled {
            let settings = WatchdogSettings {
                checks: config.watchdog.checks,
                timeout: config.units(config.watchdog.timeout_units),
                period: config.units(config.watchdog.period_units),
                retry: config.watchdog.retry,
            };
            let watchdog = Watchdog::new(
                Arc::clone(&shared),
                Arc::clone(&self.clock),
                Arc::clone(&self.sink),
                settings,
                stop.clone(),
            );
            let priority = rt.then_some(rt_prio::WATCHDOG_PRIORITY);
            match spawn_worker("watchdog", priority, &shared, &stop, move || watchdog.run()) {
                Ok(h) => Some(h),
                Err(e) => {
                    abort_started(&shared, &stop, producer);
                    abort_started(&shared, &stop, consumer);
                    return Err(e);
                }
            }
        } else {
            None
        };

        tracing::info!(
            time_unit_ms = config.time_unit_ms,
            reads = config.consumer.iterations,
            watchdog = config.watchdog.enabled,
            "navigation threads started"
        );

        Ok(RunningSystem {
            shared,
            stop,
            producer,
            consumer,
            watchdog,
        })
    }
}

/// Handles to a started run.
pub struct RunningSystem {
    shared: Arc<SharedState>,
    stop: StopToken,
    producer: JoinHandle<Result<ProducerReport>>,
    consumer: JoinHandle<Result<ConsumerReport>>,
    watchdog: Option<JoinHandle<Result<WatchdogReport>>>,
}

impl RunningSystem {
    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// A stop request that can be sent from another thread while this
    /// system is blocked in [`join`](Self::join).
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
            stop: self.stop.clone(),
        }
    }

    /// Request every thread to finish, including a reader blocked waiting
    /// for a sample.
    pub fn stop(&self) -> Result<()> {
        request_stop(&self.shared, &self.stop)
    }

    /// Wait for every thread to reach its terminal state.
    /// Returns the first error any of them reported.
    pub fn join(self) -> Result<RunReport> {
        let consumer = join_worker("consumer", self.consumer);
        let producer = join_worker("producer", self.producer);
        let watchdog = self.watchdog.map(|h| join_worker("watchdog", h)).transpose();
        Ok(RunReport {
            consumer: consumer?,
            producer: producer?,
            watchdog: watchdog?,
        })
    }
}

#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<SharedState>,
    stop: StopToken,
}

impl StopHandle {
    pub fn stop(&self) -> Result<()> {
        request_stop(&self.shared, &self.stop)
    }
}

fn request_stop(shared: &SharedState, stop: &StopToken) -> Result<()> {
    stop.stop();
    shared.wake_all()?;
    Ok(())
}

fn spawn_worker<T, F>(
    name: &'static str,
    priority: Option<i32>,
    shared: &Arc<SharedState>,
    stop: &StopToken,
    body: F,
) -> Result<JoinHandle<Result<T>>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let guard = StopOnPanic(StopHandle {
        shared: Arc::clone(shared),
        stop: stop.clone(),
    });
    thread::Builder::new()
        .name(format!("nav-{name}"))
        .spawn(move || {
            if let Some(priority) = priority {
                if let Err(e) = rt_prio::set_realtime_priority(priority) {
                    tracing::warn!("{name}: real-time priority {priority} unavailable: {e}");
                }
            }
            let result = body();
            if let Err(e) = &result {
                tracing::error!("{name} failed: {e}");
                // The other threads cannot make progress without this one.
                let _ = guard.0.stop();
            }
            drop(guard);
            result
        })
        .map_err(|source| NavError::Spawn { thread: name, source })
}

fn join_worker<T>(name: &'static str, handle: JoinHandle<Result<T>>) -> Result<T> {
    handle.join().map_err(|_| NavError::Panicked(name))?
}

fn abort_started<T>(shared: &SharedState, stop: &StopToken, handle: JoinHandle<T>) {
    let _ = request_stop(shared, stop);
    let _ = handle.join();
}

/// Requests a stop if the worker unwinds, so its peers do not wait forever.
struct StopOnPanic(StopHandle);

impl Drop for StopOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            let _ = self.0.stop();
        }
    }
}
