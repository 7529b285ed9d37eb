// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

#[cfg(unix)]
pub mod posix;

#[cfg(unix)]
pub use posix::{PlatformCondition, PlatformMutex};

#[cfg(not(unix))]
compile_error!("navsync requires POSIX threads (pthread_mutex_timedlock, pthread_cond_t)");
