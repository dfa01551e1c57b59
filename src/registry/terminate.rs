// src/registry/terminate.rs

//! Graceful termination by pid.

use tracing::debug;

/// Send the graceful termination signal (SIGTERM) to `pid`.
///
/// Returns `false` when the platform has no graceful signal, in which case
/// the caller should escalate right away.
#[cfg(unix)]
pub fn send_graceful(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) => debug!(pid, "sent SIGTERM"),
        Err(Errno::ESRCH) => debug!(pid, "process already gone before SIGTERM"),
        Err(e) => tracing::warn!(pid, error = %e, "failed to send SIGTERM"),
    }
    true
}

#[cfg(not(unix))]
pub fn send_graceful(pid: u32) -> bool {
    debug!(pid, "no graceful termination signal on this platform");
    false
}
