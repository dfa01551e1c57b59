// src/watch/classify.rs

//! Mapping from raw `notify` events to [`FsChange`]s.

use std::path::Path;

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind};

use crate::fs::FileSystem;
use crate::watch::path_utils::is_direct_child;
use crate::watch::{ChangeKind, FsChange};

/// Classify one notify event into zero or more changes.
///
/// | notify kind                  | change                              |
/// |------------------------------|-------------------------------------|
/// | `Create(_)`                  | `Created`                           |
/// | `Modify(Data(_))`, `Modify(Any)` | `Modified`                      |
/// | `Modify(Name(From))`         | `Removed`                           |
/// | `Modify(Name(To))`           | `Created`                           |
/// | `Modify(Name(Both))`         | `Removed` old path, `Created` new   |
/// | other renames                | `Created` if the path exists, else `Removed` |
/// | `Remove(_)`                  | `Removed`                           |
/// | `Access(Close(Write))`       | `Modified`                          |
/// | metadata, other access, other | ignored                            |
///
/// Paths that are not direct children of `root` are dropped.
pub fn classify_event(event: &Event, root: &Path, fs: &dyn FileSystem) -> Vec<FsChange> {
    let changes: Vec<FsChange> = match event.kind {
        EventKind::Create(_) => all_paths(event, ChangeKind::Created),
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            all_paths(event, ChangeKind::Modified)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            all_paths(event, ChangeKind::Removed)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            all_paths(event, ChangeKind::Created)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to] => vec![
                FsChange::new(ChangeKind::Removed, from.clone()),
                FsChange::new(ChangeKind::Created, to.clone()),
            ],
            _ => by_existence(event, fs),
        },
        EventKind::Modify(ModifyKind::Name(_)) => by_existence(event, fs),
        EventKind::Remove(_) => all_paths(event, ChangeKind::Removed),
        // A copy in progress keeps the file open for writing and exec fails
        // with ETXTBSY until it is closed.
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            all_paths(event, ChangeKind::Modified)
        }
        EventKind::Modify(_) | EventKind::Access(_) | EventKind::Any | EventKind::Other => {
            Vec::new()
        }
    };

    changes
        .into_iter()
        .filter(|c| is_direct_child(root, &c.path))
        .collect()
}

fn all_paths(event: &Event, kind: ChangeKind) -> Vec<FsChange> {
    event
        .paths
        .iter()
        .map(|p| FsChange::new(kind, p.clone()))
        .collect()
}

fn by_existence(event: &Event, fs: &dyn FileSystem) -> Vec<FsChange> {
    event
        .paths
        .iter()
        .map(|p| {
            let kind = if fs.exists(p) {
                ChangeKind::Created
            } else {
                ChangeKind::Removed
            };
            FsChange::new(kind, p.clone())
        })
        .collect()
}
