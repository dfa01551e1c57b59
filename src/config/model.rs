// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [supervisor]
/// reconcile_interval = "15s"
/// stop_grace = "100ms"
/// shutdown_timeout = "5s"
/// ```
///
/// All sections and keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: RawSupervisorSection,
}

/// `[supervisor]` section with durations still in their string form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSupervisorSection {
    /// Period of the full reconciliation pass.
    pub reconcile_interval: Option<String>,

    /// Grace window between SIGTERM and SIGKILL.
    pub stop_grace: Option<String>,

    /// Upper bound on waiting for children at shutdown.
    pub shutdown_timeout: Option<String>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub supervisor: SupervisorSection,
}

/// Validated `[supervisor]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorSection {
    pub reconcile_interval: Option<Duration>,
    pub stop_grace: Option<Duration>,
    pub shutdown_timeout: Option<Duration>,
}
