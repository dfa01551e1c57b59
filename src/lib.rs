// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod signals;
pub mod supervisor;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{SupervisorOptions, load_and_validate};
use crate::fs::{FileSystem, RealFileSystem};
use crate::registry::ProcessRegistry;
use crate::signals::spawn_signal_listener;
use crate::supervisor::{Supervisor, SupervisorSettings};
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - optional config file + CLI overrides
/// - the process registry
/// - the directory watcher
/// - the signal listener
/// - the supervisor loop
pub async fn run(args: CliArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => Some(
            load_and_validate(path)
                .with_context(|| format!("loading config file {:?}", path))?,
        ),
        None => None,
    };
    let options = SupervisorOptions::resolve(&args, file_config.as_ref());

    let dir = args
        .dir
        .clone()
        .context("missing directory argument")?;
    // Canonical once, so watch event paths and directory listings agree.
    let dir = dir
        .canonicalize()
        .with_context(|| format!("resolving watched directory {:?}", dir))?;
    if !dir.is_dir() {
        bail!("{:?} is not a directory", dir);
    }

    let child_args = args.child_args();
    info!(dir = %dir.display(), ?child_args, ?options, "starting dropvisor");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = ProcessRegistry::with_fs(Arc::clone(&fs), options.stop_grace);

    // Dropping the handle stops watching, so keep it until the loop returns.
    let (_watcher, watch) = spawn_watcher(&dir, Arc::clone(&fs))?;

    let (stop_tx, stop_rx) = mpsc::channel(1);
    let _signals = spawn_signal_listener(stop_tx).context("installing signal handlers")?;

    let settings = SupervisorSettings {
        dir,
        child_args,
        options,
    };
    Supervisor::new(settings, registry, fs, watch, stop_rx)
        .run()
        .await?;

    Ok(())
}
