use std::time::Duration;

use tokio::{sync::mpsc, time::timeout};

use crate::process::{
    config::SpawnConfig,
    tokio::{
        handle::ProcessHandle,
        integration_tests::helper::{collect_events, expected_finished_handle},
    },
};
#[cfg(unix)]
use crate::process::error::ControlError;

#[cfg(unix)]
fn long_running() -> SpawnConfig {
    SpawnConfig::new("sleep 30")
}

#[cfg(windows)]
fn long_running() -> SpawnConfig {
    SpawnConfig::new("ping -n 30 127.0.0.1")
}

#[tokio::test]
async fn default_kill_terminates_child() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(long_running().monitor_stdout(true), tx)
        .await
        .expect("Failed to spawn long running command");

    handle.kill(None).expect("Failed to kill child");

    let events = timeout(Duration::from_secs(5), collect_events(&mut rx))
        .await
        .expect("Killed child should be reported promptly");
    assert_eq!(events.exits, vec![1]);
    #[cfg(unix)]
    assert_eq!(events.signals, vec![Some(nix::libc::SIGKILL)]);
    expected_finished_handle(&handle, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn kill_with_explicit_signal() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(long_running(), tx)
        .await
        .expect("Failed to spawn sleep");

    handle
        .kill(Some(nix::libc::SIGTERM))
        .expect("Failed to send SIGTERM");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.exits, vec![1]);
    assert_eq!(events.signals, vec![Some(nix::libc::SIGTERM)]);
}

#[cfg(unix)]
#[tokio::test]
async fn unknown_signal_is_rejected() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(long_running(), tx)
        .await
        .expect("Failed to spawn sleep");

    assert_eq!(handle.kill(Some(9999)), Err(ControlError::InvalidSignal(9999)));
    assert!(handle.is_running());

    handle.kill(None).expect("Failed to kill sleep");
    let events = collect_events(&mut rx).await;
    assert_eq!(events.exits, vec![1]);
}

#[tokio::test]
async fn kill_after_exit_is_noop() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(SpawnConfig::new("echo done"), tx)
        .await
        .expect("Failed to spawn echo");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.exits, vec![0]);

    handle.kill(None).expect("Killing an exited child should succeed");
    expected_finished_handle(&handle, 0);
}
