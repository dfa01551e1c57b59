// src/config/validate.rs

use std::time::Duration;

use crate::config::duration::parse_non_zero_duration;
use crate::config::model::{ConfigFile, RawConfigFile, SupervisorSection};
use crate::errors::{Result, SupervisorError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SupervisorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let s = raw.supervisor;
        Ok(ConfigFile {
            supervisor: SupervisorSection {
                reconcile_interval: non_zero_duration(
                    "reconcile_interval",
                    s.reconcile_interval.as_deref(),
                )?,
                stop_grace: non_zero_duration("stop_grace", s.stop_grace.as_deref())?,
                shutdown_timeout: non_zero_duration(
                    "shutdown_timeout",
                    s.shutdown_timeout.as_deref(),
                )?,
            },
        })
    }
}

fn non_zero_duration(key: &str, value: Option<&str>) -> Result<Option<Duration>> {
    let Some(value) = value else {
        return Ok(None);
    };

    parse_non_zero_duration(value)
        .map(Some)
        .map_err(|e| SupervisorError::Config(format!("[supervisor].{key}: {e}")))
}
