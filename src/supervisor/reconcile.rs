// src/supervisor/reconcile.rs

//! Full reconciliation pass between the directory and the registry.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::registry::ProcessRegistry;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tracked processes stopped because their artifact is gone.
    pub stopped: Vec<PathBuf>,
    /// Artifacts newly started by this pass.
    pub started: Vec<PathBuf>,
    /// Artifacts that were already running.
    pub already_running: usize,
    /// Artifacts whose start failed; they are retried on the next pass.
    pub failed: Vec<PathBuf>,
}

/// Stop processes whose artifact disappeared, then start every artifact in
/// `dir` that is not running yet.
///
/// Subdirectories are skipped. A directory that cannot be listed leaves the
/// start half of the pass empty; the stop half has already run.
pub fn reconcile(
    registry: &ProcessRegistry,
    fs: &dyn FileSystem,
    dir: &Path,
    child_args: &[String],
) -> ReconcileReport {
    let mut report = ReconcileReport {
        stopped: registry.stop_non_existent(),
        ..Default::default()
    };

    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list watched directory");
            return report;
        }
    };

    for path in entries {
        if fs.is_dir(&path) {
            debug!(path = %path.display(), "skipping subdirectory");
            continue;
        }

        match registry.start(&path, child_args) {
            Ok(pid) => {
                info!(path = %path.display(), pid, "started program");
                report.started.push(path);
            }
            Err(e) if e.is_already_started() => report.already_running += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to start program");
                report.failed.push(path);
            }
        }
    }

    report
}
