// src/supervisor/runtime.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::SupervisorOptions;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::registry::ProcessRegistry;
use crate::signals::ShutdownSignal;
use crate::watch::WatchStreams;

use super::core::SupervisorCore;
use super::reconcile::reconcile;
use super::{Action, SupervisorEvent};

/// Static inputs of the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    /// Watched directory, canonical.
    pub dir: PathBuf,
    /// Arguments after the program name for every child.
    pub child_args: Vec<String>,
    pub options: SupervisorOptions,
}

/// Async shell around [`SupervisorCore`].
///
/// Owns the event sources and applies the core's actions to the registry.
pub struct Supervisor {
    core: SupervisorCore,
    settings: SupervisorSettings,
    registry: ProcessRegistry,
    fs: Arc<dyn FileSystem>,
    watch: WatchStreams,
    stop_rx: mpsc::Receiver<ShutdownSignal>,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(
        settings: SupervisorSettings,
        registry: ProcessRegistry,
        fs: Arc<dyn FileSystem>,
        watch: WatchStreams,
        stop_rx: mpsc::Receiver<ShutdownSignal>,
    ) -> Self {
        Self {
            core: SupervisorCore::new(),
            settings,
            registry,
            fs,
            watch,
            stop_rx,
        }
    }

    /// Main loop. Returns once a stop request has been handled and the
    /// registry drained.
    ///
    /// The timer's first tick fires immediately, so the directory is
    /// reconciled as soon as the loop starts.
    pub async fn run(mut self) -> Result<()> {
        self.core.start();
        info!(
            dir = %self.settings.dir.display(),
            reconcile_interval = ?self.settings.options.reconcile_interval,
            "supervisor running"
        );

        let mut ticker = tokio::time::interval(self.settings.options.reconcile_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let event = tokio::select! {
                Some(change) = self.watch.changes.recv() => SupervisorEvent::FileChanged(change),
                Some(err) = self.watch.errors.recv() => SupervisorEvent::WatchError(err.to_string()),
                _ = ticker.tick() => SupervisorEvent::Tick,
                Some(signal) = self.stop_rx.recv() => SupervisorEvent::StopRequested(signal),
            };

            debug!(?event, "supervisor received event");

            let step = self.core.step(event);
            for action in step.actions {
                self.apply(action).await;
            }

            if !step.keep_running {
                break;
            }
        }

        self.core.finish();
        info!(state = ?self.core.state(), "supervisor stopped");
        Ok(())
    }

    async fn apply(&mut self, action: Action) {
        match action {
            Action::Start(path) => self.start_one(&path),
            Action::Restart(path) => {
                info!(path = %path.display(), "artifact modified; restarting");
                self.stop_one(&path);
                self.start_one(&path);
            }
            Action::Stop(path) => self.stop_one(&path),
            Action::Reconcile(reason) => {
                let report = reconcile(
                    &self.registry,
                    self.fs.as_ref(),
                    &self.settings.dir,
                    &self.settings.child_args,
                );
                debug!(
                    ?reason,
                    stopped = report.stopped.len(),
                    started = report.started.len(),
                    already_running = report.already_running,
                    failed = report.failed.len(),
                    "reconciliation pass complete"
                );
            }
            Action::Shutdown => {
                let count = self.registry.stop_all();
                info!(count, "stopping all programs");

                let timeout = self.settings.options.shutdown_timeout;
                if !self.registry.drain(timeout).await {
                    warn!(?timeout, "some programs had not exited by the shutdown timeout");
                }
            }
        }
    }

    fn start_one(&self, path: &Path) {
        if self.fs.is_dir(path) {
            debug!(path = %path.display(), "ignoring subdirectory");
            return;
        }

        match self.registry.start(path, &self.settings.child_args) {
            Ok(pid) => info!(path = %path.display(), pid, "started program"),
            Err(e) if e.is_already_started() => {
                debug!(path = %path.display(), "program already running")
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to start program"),
        }
    }

    fn stop_one(&self, path: &Path) {
        if let Err(e) = self.registry.stop(path) {
            warn!(path = %path.display(), error = %e, "failed to stop program");
        }
    }
}
