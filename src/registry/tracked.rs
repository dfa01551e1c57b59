// src/registry/tracked.rs

use std::time::{Duration, Instant};

use tokio::sync::oneshot;

/// One entry of the registry, keyed by artifact path: the pid currently
/// running it.
///
/// The pid is never changed in place. A restart removes the entry and inserts
/// a new one.
#[derive(Debug)]
pub struct TrackedProcess {
    pid: u32,
    started_at: Instant,
    /// Asks the reaper to force-kill its child. Taken by `stop` and handed
    /// to the escalation timer.
    kill_tx: Option<oneshot::Sender<()>>,
}

impl TrackedProcess {
    pub(crate) fn new(pid: u32, kill_tx: oneshot::Sender<()>) -> Self {
        Self {
            pid,
            started_at: Instant::now(),
            kill_tx: Some(kill_tx),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub(crate) fn take_kill_tx(&mut self) -> Option<oneshot::Sender<()>> {
        self.kill_tx.take()
    }
}
