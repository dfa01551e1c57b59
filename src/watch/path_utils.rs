// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Whether `path` is an entry directly inside `root` (not `root` itself and
/// not something nested deeper).
///
/// Tries a plain comparison first, then compares canonicalized parents to
/// cope with symlinked prefixes (e.g. `/private/var` on macOS).
pub fn is_direct_child(root: &Path, path: &Path) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    if path.file_name().is_none() {
        return false;
    }
    if parent == root {
        return true;
    }

    match (root.canonicalize(), parent.canonicalize()) {
        (Ok(root_canon), Ok(parent_canon)) => root_canon == parent_canon,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_children_only() {
        let root = Path::new("/srv/bin");
        assert!(is_direct_child(root, Path::new("/srv/bin/svc-a")));
        assert!(!is_direct_child(root, Path::new("/srv/bin")));
        assert!(!is_direct_child(root, Path::new("/srv/bin/sub/svc-b")));
        assert!(!is_direct_child(root, Path::new("/srv/other/svc-a")));
    }
}
