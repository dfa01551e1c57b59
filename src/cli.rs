// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::parse_non_zero_duration;

/// Fixed placeholder passed to every child right after the environment name.
pub const CHILD_PLACEHOLDER_ARG: &str = "0";

/// Command-line arguments for `dropvisor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dropvisor",
    about = "Run every executable in a directory and keep them in sync with its contents.",
    long_about = None,
    disable_version_flag = true,
    override_usage = "dropvisor [OPTIONS] <ENV_NAME> <DIR> <ENDPOINT>...\n       dropvisor -v"
)]
pub struct CliArgs {
    /// Print version and build time, then exit.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Environment name passed to every child.
    #[arg(value_name = "ENV_NAME", required_unless_present = "version")]
    pub env_name: Option<String>,

    /// Directory whose executables are supervised.
    #[arg(value_name = "DIR", required_unless_present = "version")]
    pub dir: Option<PathBuf>,

    /// Endpoint addresses appended to every child's arguments.
    #[arg(
        value_name = "ENDPOINT",
        required_unless_present = "version",
        num_args = 1..
    )]
    pub endpoints: Vec<String>,

    /// Optional TOML config file with a `[supervisor]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How often the directory is fully reconciled (e.g. `15s`).
    #[arg(long, value_name = "DURATION", value_parser = parse_non_zero_duration)]
    pub reconcile_interval: Option<Duration>,

    /// Grace window between SIGTERM and SIGKILL when stopping a child (e.g. `100ms`).
    #[arg(long, value_name = "DURATION", value_parser = parse_non_zero_duration)]
    pub stop_grace: Option<Duration>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DROPVISOR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Arguments every child receives after its own program name:
    /// `[env_name, "0", endpoint...]`.
    pub fn child_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.endpoints.len() + 2);
        args.push(self.env_name.clone().unwrap_or_default());
        args.push(CHILD_PLACEHOLDER_ARG.to_string());
        args.extend(self.endpoints.iter().cloned());
        args
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Text printed for `-v`.
pub fn version_text() -> String {
    format!(
        "version: {}\nbuildTime: {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("DROPVISOR_BUILD_TIME").unwrap_or("unknown")
    )
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
