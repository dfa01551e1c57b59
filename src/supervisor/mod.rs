// src/supervisor/mod.rs

//! Supervision loop.
//!
//! The loop merges four event sources into registry calls:
//! - classified filesystem changes from the watcher
//! - watcher errors
//! - the periodic reconciliation timer
//! - the stop request from the signal listener
//!
//! The pure state machine lives in [`core`]; the async shell that owns the
//! channels and the registry is in [`runtime`]. [`reconcile`] implements the
//! full directory/registry reconciliation pass.

use std::path::PathBuf;

use crate::signals::ShutdownSignal;
use crate::watch::FsChange;

pub mod core;
pub mod reconcile;
pub mod runtime;

pub use self::core::{CoreStep, SupervisorCore};
pub use reconcile::{ReconcileReport, reconcile};
pub use runtime::{Supervisor, SupervisorSettings};

/// Lifecycle of the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

/// Why a reconciliation pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileReason {
    /// The periodic timer fired.
    Timer,
    /// The watcher reported an error; events may have been lost.
    WatchError,
}

/// Events flowing into the supervisor loop.
#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    FileChanged(FsChange),
    WatchError(String),
    Tick,
    StopRequested(ShutdownSignal),
}

/// What the shell should do with the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start(PathBuf),
    /// Stop, then start again.
    Restart(PathBuf),
    Stop(PathBuf),
    Reconcile(ReconcileReason),
    /// Stop everything and drain reapers.
    Shutdown,
}
