// src/config/mod.rs

//! Configuration for `dropvisor`.
//!
//! Everything is optional: the supervisor runs with defaults when no
//! `--config` file is given. Values are resolved in this order:
//! CLI flag, then the `[supervisor]` section of the TOML file, then the
//! built-in default.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

use std::time::Duration;

pub use duration::{parse_duration, parse_non_zero_duration};
pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, RawConfigFile, RawSupervisorSection, SupervisorSection};

use crate::cli::CliArgs;

/// Default period of the full reconciliation pass.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(15);

/// Default grace window between SIGTERM and SIGKILL.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_millis(100);

/// Default upper bound on waiting for children to exit at shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Fully resolved timing knobs used by the registry and the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorOptions {
    pub reconcile_interval: Duration,
    pub stop_grace: Duration,
    pub shutdown_timeout: Duration,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
            stop_grace: DEFAULT_STOP_GRACE,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl SupervisorOptions {
    /// Merge CLI flags over an (optional) config file over the defaults.
    pub fn resolve(args: &CliArgs, file: Option<&ConfigFile>) -> Self {
        let defaults = Self::default();
        let section = file.map(|f| &f.supervisor);

        Self {
            reconcile_interval: args
                .reconcile_interval
                .or(section.and_then(|s| s.reconcile_interval))
                .unwrap_or(defaults.reconcile_interval),
            stop_grace: args
                .stop_grace
                .or(section.and_then(|s| s.stop_grace))
                .unwrap_or(defaults.stop_grace),
            shutdown_timeout: section
                .and_then(|s| s.shutdown_timeout)
                .unwrap_or(defaults.shutdown_timeout),
        }
    }
}
