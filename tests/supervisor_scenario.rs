// tests/supervisor_scenario.rs
#![cfg(unix)]

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use dropvisor::config::SupervisorOptions;
use dropvisor::fs::{FileSystem, RealFileSystem};
use dropvisor::registry::ProcessRegistry;
use dropvisor::signals::ShutdownSignal;
use dropvisor::supervisor::{Supervisor, SupervisorSettings};
use dropvisor::watch::{ChangeKind, FsChange, WatchStreams};
use dropvisor_test_utils::artifacts::sleeper;
use dropvisor_test_utils::{init_tracing, is_alive, wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn options(reconcile_interval: Duration) -> SupervisorOptions {
    SupervisorOptions {
        reconcile_interval,
        stop_grace: Duration::from_millis(100),
        shutdown_timeout: Duration::from_secs(2),
    }
}

/// Create → one entry; Write → one entry with a new pid; Remove → none.
#[tokio::test]
async fn create_write_remove_scenario() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let dir_path = dir.path().canonicalize()?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = ProcessRegistry::with_fs(Arc::clone(&fs), Duration::from_millis(100));
    let (change_tx, _error_tx, watch) = WatchStreams::manual();
    let (stop_tx, stop_rx) = mpsc::channel(1);

    let settings = SupervisorSettings {
        dir: dir_path.clone(),
        child_args: vec!["test".into(), "0".into(), "127.0.0.1:2379".into()],
        // Long enough that only the startup pass runs.
        options: options(Duration::from_secs(3600)),
    };
    let supervisor = Supervisor::new(settings, registry.clone(), fs, watch, stop_rx);
    let loop_handle = tokio::spawn(supervisor.run());

    let svc = sleeper(&dir_path, "svc-a");
    change_tx.send(FsChange::new(ChangeKind::Created, &svc))?;
    wait_until("svc-a started", || registry.pid_of(&svc).is_some()).await;
    let first = registry.pid_of(&svc).ok_or("no pid")?;
    assert_eq!(registry.len(), 1);

    change_tx.send(FsChange::new(ChangeKind::Modified, &svc))?;
    wait_until("svc-a restarted", || {
        registry.pid_of(&svc).is_some_and(|pid| pid != first)
    })
    .await;
    assert_eq!(registry.len(), 1);
    wait_until("old instance gone", || !is_alive(first)).await;

    std::fs::remove_file(&svc)?;
    change_tx.send(FsChange::new(ChangeKind::Removed, &svc))?;
    wait_until("svc-a stopped", || registry.is_empty()).await;

    stop_tx.send(ShutdownSignal::Terminate).await?;
    with_timeout(loop_handle).await??;
    Ok(())
}

#[tokio::test]
async fn startup_pass_and_shutdown_drain() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let dir_path = dir.path().canonicalize()?;
    for name in ["svc-a", "svc-b", "svc-c"] {
        sleeper(&dir_path, name);
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = ProcessRegistry::with_fs(Arc::clone(&fs), Duration::from_millis(100));
    let (_change_tx, _error_tx, watch) = WatchStreams::manual();
    let (stop_tx, stop_rx) = mpsc::channel(1);

    let settings = SupervisorSettings {
        dir: dir_path,
        child_args: Vec::new(),
        options: options(Duration::from_secs(3600)),
    };
    let loop_handle = tokio::spawn(Supervisor::new(settings, registry.clone(), fs, watch, stop_rx).run());

    wait_until("all artifacts started", || registry.len() == 3).await;
    let pids: Vec<u32> = registry
        .tracked_paths()
        .iter()
        .filter_map(|p| registry.pid_of(p))
        .collect();

    stop_tx.send(ShutdownSignal::Interrupt).await?;
    with_timeout(loop_handle).await??;

    assert!(registry.is_empty());
    for pid in pids {
        assert!(!is_alive(pid), "pid {pid} survived shutdown");
    }
    Ok(())
}

#[tokio::test]
async fn periodic_pass_restarts_externally_killed_children() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let dir_path = dir.path().canonicalize()?;
    let svc = sleeper(&dir_path, "svc-a");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = ProcessRegistry::with_fs(Arc::clone(&fs), Duration::from_millis(100));
    let (_change_tx, _error_tx, watch) = WatchStreams::manual();
    let (stop_tx, stop_rx) = mpsc::channel(1);

    let settings = SupervisorSettings {
        dir: dir_path,
        child_args: Vec::new(),
        options: options(Duration::from_millis(100)),
    };
    let loop_handle = tokio::spawn(Supervisor::new(settings, registry.clone(), fs, watch, stop_rx).run());

    wait_until("svc-a started", || registry.pid_of(&svc).is_some()).await;
    let first = registry.pid_of(&svc).ok_or("no pid")?;

    nix::sys::signal::kill(
        nix::unistd::Pid::from_raw(first as i32),
        nix::sys::signal::Signal::SIGKILL,
    )?;

    wait_until("svc-a back up with a new pid", || {
        registry.pid_of(&svc).is_some_and(|pid| pid != first)
    })
    .await;

    stop_tx.send(ShutdownSignal::Quit).await?;
    with_timeout(loop_handle).await??;
    Ok(())
}

#[tokio::test]
async fn watch_error_triggers_reconciliation() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let dir_path = dir.path().canonicalize()?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = ProcessRegistry::with_fs(Arc::clone(&fs), Duration::from_millis(100));
    let (_change_tx, error_tx, watch) = WatchStreams::manual();
    let (stop_tx, stop_rx) = mpsc::channel(1);

    let settings = SupervisorSettings {
        dir: dir_path.clone(),
        child_args: Vec::new(),
        options: options(Duration::from_secs(3600)),
    };
    let loop_handle = tokio::spawn(Supervisor::new(settings, registry.clone(), fs, watch, stop_rx).run());

    // Let the startup pass see an empty directory first.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let svc = sleeper(&dir_path, "svc-a");
    assert!(registry.is_empty());

    error_tx.send(notify::Error::generic("event queue overflowed"))?;
    wait_until("svc-a started by reconciliation", || registry.pid_of(&svc).is_some()).await;

    stop_tx.send(ShutdownSignal::Terminate).await?;
    with_timeout(loop_handle).await??;
    Ok(())
}
