// src/registry/process_registry.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::oneshot;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::config::DEFAULT_STOP_GRACE;
use crate::errors::{Result, SupervisorError};
use crate::fs::{FileSystem, RealFileSystem};

use super::reaper::{reap, schedule_escalation};
use super::terminate::send_graceful;
use super::tracked::TrackedProcess;

/// Shared handle to the process registry.
///
/// Cloning is cheap; all clones see the same map. Operations that spawn
/// processes or background tasks must run inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    processes: Mutex<HashMap<PathBuf, TrackedProcess>>,
    reapers: TaskTracker,
    fs: Arc<dyn FileSystem>,
    stop_grace: Duration,
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_GRACE)
    }
}

impl ProcessRegistry {
    pub fn new(stop_grace: Duration) -> Self {
        Self::with_fs(Arc::new(RealFileSystem), stop_grace)
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>, stop_grace: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                processes: Mutex::new(HashMap::new()),
                reapers: TaskTracker::new(),
                fs,
                stop_grace,
            }),
        }
    }

    /// Start the artifact at `path` unless it is already running.
    ///
    /// The child gets `[file name of path] + extra_args` as its argv and
    /// inherits our stdio. Returns the new pid, or
    /// [`SupervisorError::AlreadyStarted`] without side effects if `path`
    /// already has an entry.
    ///
    /// The spawn happens under the registry lock, so concurrent operations
    /// wait for process creation to finish.
    pub fn start(&self, path: impl AsRef<Path>, extra_args: &[String]) -> Result<u32> {
        let path = self.resolve(path.as_ref())?;

        let mut processes = self.lock();
        if processes.contains_key(&path) {
            return Err(SupervisorError::AlreadyStarted(path));
        }

        let program_name = program_name(&path);
        info!(
            path = %path.display(),
            "{}",
            command_line(&program_name, extra_args)
        );

        let mut cmd = Command::new(&path);
        #[cfg(unix)]
        cmd.arg0(&program_name);
        cmd.args(extra_args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
            path: path.clone(),
            source,
        })?;
        let pid = child.id().ok_or_else(|| SupervisorError::Spawn {
            path: path.clone(),
            source: std::io::Error::other("child exited before its pid was read"),
        })?;

        let (kill_tx, kill_rx) = oneshot::channel();
        processes.insert(path.clone(), TrackedProcess::new(pid, kill_tx));
        drop(processes);

        self.inner
            .reapers
            .spawn(reap(self.clone(), path, pid, child, kill_rx));

        Ok(pid)
    }

    /// Stop the process running `path`, if any.
    ///
    /// Sends SIGTERM and arms a SIGKILL for after the grace window, without
    /// waiting for either. Stopping an untracked path is a no-op.
    pub fn stop(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.resolve(path.as_ref())?;

        let mut processes = self.lock();

        // The entry is removed before the process has exited. A `start` for
        // the same path can therefore spawn a new process while this one is
        // still draining; the old reaper's pid check keeps it from removing
        // the new entry.
        let Some(mut tracked) = processes.remove(&path) else {
            debug!(path = %path.display(), "stop requested for untracked path");
            return Ok(());
        };

        let pid = tracked.pid();
        let graceful = send_graceful(pid);
        if let Some(kill_tx) = tracked.take_kill_tx() {
            let grace = if graceful {
                self.inner.stop_grace
            } else {
                Duration::ZERO
            };
            schedule_escalation(path.clone(), pid, kill_tx, grace);
        }

        info!(
            path = %path.display(),
            pid,
            uptime = ?tracked.uptime(),
            "stopping program"
        );
        Ok(())
    }

    /// Stop every tracked process whose artifact no longer exists on disk.
    ///
    /// Returns the paths that were stopped.
    pub fn stop_non_existent(&self) -> Vec<PathBuf> {
        let mut stopped = Vec::new();
        for path in self.tracked_paths() {
            if self.inner.fs.exists(&path) {
                continue;
            }
            info!(path = %path.display(), "artifact is gone; stopping program");
            match self.stop(&path) {
                Ok(()) => stopped.push(path),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "stop failed"),
            }
        }
        stopped
    }

    /// Stop every tracked process. Returns how many were signalled.
    pub fn stop_all(&self) -> usize {
        let paths = self.tracked_paths();
        let count = paths.len();
        for path in paths {
            if let Err(e) = self.stop(&path) {
                tracing::warn!(path = %path.display(), error = %e, "stop failed");
            }
        }
        count
    }

    /// Wait up to `timeout` for every reaper task to finish.
    ///
    /// Meant for shutdown, after [`stop_all`](Self::stop_all). Returns `true`
    /// if all reapers finished in time.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.inner.reapers.close();
        tokio::time::timeout(timeout, self.inner.reapers.wait())
            .await
            .is_ok()
    }

    pub fn pid_of(&self, path: impl AsRef<Path>) -> Option<u32> {
        let path = self.resolve(path.as_ref()).ok()?;
        self.lock().get(&path).map(TrackedProcess::pid)
    }

    /// Snapshot of all tracked paths, sorted.
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove the entry for `path` only if it still belongs to `pid`.
    pub(crate) fn remove_if_current(&self, path: &Path, pid: u32) -> Option<TrackedProcess> {
        let mut processes = self.lock();
        match processes.get(path) {
            Some(tracked) if tracked.pid() == pid => processes.remove(path),
            _ => None,
        }
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        self.inner
            .fs
            .absolute(path)
            .map_err(|source| SupervisorError::PathResolution {
                path: path.to_path_buf(),
                source,
            })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, TrackedProcess>> {
        // The map stays consistent even if a holder panicked mid-operation.
        self.inner
            .processes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn program_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn command_line(program_name: &str, extra_args: &[String]) -> String {
    std::iter::once(program_name)
        .chain(extra_args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
