// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Runs one producer, one consumer and one watchdog over the shared
// navigation record until the consumer has read its quota.
//
// Environment:
//   NAVSYNC_CONFIG        optional TOML config file
//   NAVSYNC_TIME_UNIT_MS  length of one time unit (default 1000)
//   RUST_LOG              log filter (default "info")

use std::io;
use std::process::ExitCode;
use std::thread;

use navsync::{Config, Coordinator, NavError, RunReport};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .with_target(false)
        .init();
}

/// SIGINT, SIGTERM and SIGHUP, blocked in the calling thread and in every
/// thread it spawns afterwards. Only the `sigwait` thread ever receives them,
/// so the stop callback runs in normal thread context.
struct StopSignals(libc::sigset_t);

impl StopSignals {
    fn block() -> io::Result<Self> {
        unsafe {
            let mut set: libc::sigset_t = std::mem::zeroed();
            libc::sigemptyset(&mut set);
            for sig in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
                libc::sigaddset(&mut set, sig);
            }
            let eno = libc::pthread_sigmask(libc::SIG_BLOCK, &set, std::ptr::null_mut());
            if eno != 0 {
                return Err(io::Error::from_raw_os_error(eno));
            }
            Ok(Self(set))
        }
    }

    /// Run `f` once, when the first of the signals arrives.
    fn ctrlc_or_sigterm(self, f: impl FnOnce() + Send + 'static) -> io::Result<()> {
        thread::Builder::new().name("nav-signals".into()).spawn(move || {
            let mut sig: libc::c_int = 0;
            if unsafe { libc::sigwait(&self.0, &mut sig) } == 0 {
                tracing::info!(signal = sig, "stop requested");
                f();
            }
        })?;
        Ok(())
    }
}

fn run(config: Config) -> navsync::Result<RunReport> {
    // Block before starting so the worker threads inherit the mask.
    let signals = StopSignals::block().map_err(|source| NavError::Init {
        primitive: "signal mask",
        source,
    })?;
    let system = Coordinator::new(config).start()?;

    let handle = system.stop_handle();
    let watched = signals.ctrlc_or_sigterm(move || {
        if let Err(e) = handle.stop() {
            tracing::error!("stop failed: {e}");
        }
    });
    if let Err(source) = watched {
        let _ = system.stop();
        let _ = system.join();
        return Err(NavError::Spawn { thread: "signals", source });
    }

    system.join()
}

fn main() -> ExitCode {
    init_logging();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(report) => {
            tracing::info!(
                producer_cycles = report.producer.cycles,
                consumed = report.consumer.consumed,
                watchdog_timeouts = report.watchdog.map_or(0, |w| w.timeouts),
                "all threads finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}
