// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Real-time scheduling for the calling thread.

use std::io;

/// Fixed priorities, rate-monotonic: the fastest loop gets the highest.
pub const PRODUCER_PRIORITY: i32 = 80;
pub const WATCHDOG_PRIORITY: i32 = 70;
pub const CONSUMER_PRIORITY: i32 = 60;

/// Switch the calling thread to `SCHED_FIFO` at `priority`.
///
/// Requires CAP_SYS_NICE or root; fails with the OS error otherwise.
#[cfg(target_os = "linux")]
pub fn set_realtime_priority(priority: i32) -> io::Result<()> {
    let max = unsafe { libc::sched_get_priority_max(libc::SCHED_FIFO) };
    let min = unsafe { libc::sched_get_priority_min(libc::SCHED_FIFO) };
    let param = libc::sched_param {
        sched_priority: priority.clamp(min, max),
    };
    let eno = unsafe { libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param) };
    if eno != 0 {
        return Err(io::Error::from_raw_os_error(eno));
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn set_realtime_priority(priority: i32) -> io::Result<()> {
    let _ = priority;
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "SCHED_FIFO thread priority is only supported on Linux",
    ))
}
