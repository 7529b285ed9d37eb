// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Error, Debug)]
pub enum NavError {
    /// A mutex, a condition variable or the signal mask could not be set up.
    #[error("failed to initialise {primitive}: {source}")]
    Init {
        primitive: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn {thread} thread: {source}")]
    Spawn {
        thread: &'static str,
        #[source]
        source: io::Error,
    },

    /// Lock, unlock, wait or signal reported an error status.
    #[error("synchronisation primitive failed: {0}")]
    Sync(#[from] io::Error),

    #[error("{0} thread panicked")]
    Panicked(&'static str),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl NavError {
    /// Whether the error happened before any thread started.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            NavError::Init { .. }
                | NavError::Spawn { .. }
                | NavError::ConfigRead { .. }
                | NavError::ConfigParse(_)
                | NavError::InvalidConfig(_)
        )
    }
}
