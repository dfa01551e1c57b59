// src/watch/watcher.rs

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::fs::FileSystem;
use crate::watch::FsChange;
use crate::watch::classify::classify_event;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching and closes the streams.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Receiving ends consumed by the supervisor loop.
#[derive(Debug)]
pub struct WatchStreams {
    pub changes: mpsc::UnboundedReceiver<FsChange>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

impl WatchStreams {
    /// A pair of streams fed by hand instead of by `notify`.
    pub fn manual() -> (
        mpsc::UnboundedSender<FsChange>,
        mpsc::UnboundedSender<notify::Error>,
        Self,
    ) {
        let (change_tx, changes) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        (change_tx, error_tx, Self { changes, errors })
    }
}

/// Watch `dir` (non-recursively) and stream classified changes for its
/// direct children.
///
/// `dir` should already be canonical so event paths line up with the paths
/// produced by listing the directory. Failing to create the watcher or to
/// subscribe the directory is a setup error.
pub fn spawn_watcher(dir: &Path, fs: Arc<dyn FileSystem>) -> Result<(WatcherHandle, WatchStreams)> {
    let (change_tx, error_tx, streams) = WatchStreams::manual();
    let root = dir.to_path_buf();

    // Called synchronously on notify's own thread for every event.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                trace!(?event, "received notify event");
                for change in classify_event(&event, &root, fs.as_ref()) {
                    // Receiver gone means the supervisor is shutting down.
                    let _ = change_tx.send(change);
                }
            }
            Err(err) => {
                let _ = error_tx.send(err);
            }
        },
        Config::default(),
    )
    .context("creating file watcher")?;

    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching directory {:?}", dir))?;

    info!("file watcher started on {:?}", dir);

    Ok((WatcherHandle { _inner: watcher }, streams))
}
