// src/registry/mod.rs

//! Process registry: the authoritative mapping from artifact path to the pid
//! of its running process.
//!
//! - [`process_registry`] owns the map and the `start`/`stop` operations.
//! - [`reaper`] holds the per-process background task that waits for exit and
//!   removes the entry if it is still current.
//! - [`terminate`] sends the graceful termination signal by pid.
//! - [`tracked`] defines the map entry.
//!
//! Callers never see the map itself; every mutation goes through
//! [`ProcessRegistry`], whose single lock linearizes them.

pub mod process_registry;
pub mod reaper;
pub mod terminate;
pub mod tracked;

pub use process_registry::ProcessRegistry;
pub use tracked::TrackedProcess;
