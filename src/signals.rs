// src/signals.rs

//! Termination-signal listener.

use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// The signal that asked the supervisor to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Quit,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Quit => "SIGQUIT",
        };
        f.write_str(name)
    }
}

/// Subscribe to SIGINT, SIGTERM and SIGQUIT and spawn a task that forwards the
/// first one received into `stop_tx`, then exits.
///
/// Subscription happens before this returns, so a failure to install a
/// handler is reported as a setup error.
#[cfg(unix)]
pub fn spawn_signal_listener(
    stop_tx: mpsc::Sender<ShutdownSignal>,
) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    Ok(tokio::spawn(async move {
        let received = tokio::select! {
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigterm.recv() => ShutdownSignal::Terminate,
            _ = sigquit.recv() => ShutdownSignal::Quit,
        };
        info!(signal = %received, "shutdown signal received");
        let _ = stop_tx.send(received).await;
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(
    stop_tx: mpsc::Sender<ShutdownSignal>,
) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!(signal = %ShutdownSignal::Interrupt, "shutdown signal received");
        let _ = stop_tx.send(ShutdownSignal::Interrupt).await;
    }))
}
