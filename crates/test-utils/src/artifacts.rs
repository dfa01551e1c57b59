//! Helpers that drop small shell-script artifacts into a directory.

use std::fs;
use std::path::{Path, PathBuf};

/// A long-running artifact that exits on SIGTERM.
pub fn sleeper(dir: &Path, name: &str) -> PathBuf {
    script(dir, name, "exec sleep 30\n")
}

/// A long-running artifact that ignores SIGTERM and only dies to SIGKILL.
pub fn stubborn(dir: &Path, name: &str) -> PathBuf {
    script(dir, name, "trap '' TERM\nexec sleep 30\n")
}

/// A long-running artifact that first writes its arguments to `out`.
pub fn args_recorder(dir: &Path, name: &str, out: &Path) -> PathBuf {
    script(
        dir,
        name,
        &format!("echo \"$@\" > '{}'\nexec sleep 30\n", out.display()),
    )
}

/// A plain file without the executable bit.
pub fn not_executable(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\nexit 0\n").expect("writing artifact");
    path
}

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("writing artifact");
    make_executable(&path);
    path
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).expect("artifact metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod artifact");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
