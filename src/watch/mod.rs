// src/watch/mod.rs

//! File watching for the supervised directory.
//!
//! This module is responsible for:
//! - Wiring up a non-recursive `notify` watcher on the directory.
//! - Turning raw notify events into [`FsChange`]s for direct children of the
//!   directory ([`classify`]).
//! - Forwarding watcher errors on their own channel.
//!
//! It does not know about processes; the supervisor decides what a change
//! means.

pub mod classify;
pub mod path_utils;
pub mod watcher;

use std::path::PathBuf;

pub use classify::classify_event;
pub use watcher::{WatchStreams, WatcherHandle, spawn_watcher};

/// What happened to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A new file appeared (created or renamed into the directory).
    Created,
    /// The file's contents were written.
    Modified,
    /// The file was removed or renamed away.
    Removed,
}

/// A classified filesystem change for one artifact path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsChange {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl FsChange {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}
