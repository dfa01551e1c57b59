// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    /// The artifact already has a live entry in the registry.
    ///
    /// This is an expected outcome of `start` (the process is already in the
    /// desired state), not a failure to report to the user.
    #[error("program already started: {0}")]
    AlreadyStarted(PathBuf),

    #[error("cannot resolve path {path:?}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {path:?}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SupervisorError {
    /// `true` for the "nothing to do, already running" outcome of `start`.
    pub fn is_already_started(&self) -> bool {
        matches!(self, SupervisorError::AlreadyStarted(_))
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
