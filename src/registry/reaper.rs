// src/registry/reaper.rs

//! Per-process background tasks: the reaper that waits for a child's exit,
//! and the escalation timer that asks it to force-kill.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::ProcessRegistry;

/// Wait for `child` to exit, then drop the registry entry for `path` if it
/// still belongs to `pid`.
///
/// If `kill_rx` fires first, the child is force-killed through its own
/// handle before waiting, so the kill never reaches a recycled pid.
pub(crate) async fn reap(
    registry: ProcessRegistry,
    path: PathBuf,
    pid: u32,
    mut child: Child,
    mut kill_rx: oneshot::Receiver<()>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        Ok(()) = &mut kill_rx => {
            warn!(
                path = %path.display(),
                pid,
                "process still running after grace window; sending SIGKILL"
            );
            if let Err(e) = child.start_kill() {
                debug!(path = %path.display(), pid, error = %e, "kill failed; process likely exited");
            }
            child.wait().await
        }
    };

    match &status {
        Ok(status) => debug!(path = %path.display(), pid, %status, "process exited"),
        Err(e) => warn!(path = %path.display(), pid, error = %e, "waiting for process failed"),
    }

    match registry.remove_if_current(&path, pid) {
        Some(tracked) => {
            let status = status
                .map(|s| s.to_string())
                .unwrap_or_else(|e| format!("unknown ({e})"));
            info!(
                path = %path.display(),
                pid,
                uptime = ?tracked.uptime(),
                %status,
                "program exited"
            );
        }
        None => debug!(
            path = %path.display(),
            pid,
            "exited process was no longer tracked; entry left untouched"
        ),
    }
}

/// Fire `kill_tx` after `grace` on an independent task.
///
/// If the reaper already finished, the receiver is gone and the send is a
/// no-op.
pub(crate) fn schedule_escalation(path: PathBuf, pid: u32, kill_tx: oneshot::Sender<()>, grace: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if kill_tx.send(()).is_err() {
            debug!(path = %path.display(), pid, "process exited within grace window");
        }
    });
}
