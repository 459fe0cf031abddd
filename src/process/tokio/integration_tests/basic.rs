use tokio::sync::mpsc;

use crate::process::{
    config::SpawnConfig,
    tokio::{
        handle::ProcessHandle,
        integration_tests::helper::{
            NEWLINE, collect_events, expected_finished_handle, expected_running_handle,
        },
        transport::StdoutMode,
    },
};

#[tokio::test]
async fn echo_stdout_then_exit() {
    let config = SpawnConfig::new("echo hello").monitor_stdout(true);
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn echo");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.stdout, format!("hello{NEWLINE}").as_bytes());
    assert!(events.stderr.is_empty());
    assert_eq!(events.exits, vec![0]);
    assert!(!events.output_after_exit, "Output must not follow the exit event");
    expected_finished_handle(&handle, 0);
}

#[tokio::test]
async fn exit_without_monitors() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(SpawnConfig::new("echo unseen"), tx)
        .await
        .expect("Failed to spawn echo");
    assert_eq!(handle.stdout_mode().await, StdoutMode::Manual);

    let events = collect_events(&mut rx).await;
    assert_eq!(events.chunks, 0);
    assert_eq!(events.exits, vec![0]);
    expected_finished_handle(&handle, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn handle_reports_state_while_running() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(SpawnConfig::new("sleep 0.5").monitor_stdout(true), tx)
        .await
        .expect("Failed to spawn sleep");

    expected_running_handle(&handle);
    assert_eq!(handle.stdout_mode().await, StdoutMode::Streaming);
    assert_eq!(handle.config().command, "sleep 0.5");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.exits, vec![0]);
    expected_finished_handle(&handle, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn exit_code_is_reported() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(SpawnConfig::new("sh -c 'exit 3'"), tx)
        .await
        .expect("Failed to spawn sh");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.exits, vec![3]);
    assert_eq!(events.signals, vec![None]);
    expected_finished_handle(&handle, 3);
}

#[cfg(windows)]
#[tokio::test]
async fn exit_code_is_reported() {
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(SpawnConfig::new("exit /b 3"), tx)
        .await
        .expect("Failed to spawn cmd");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.exits, vec![3]);
    expected_finished_handle(&handle, 3);
}

#[cfg(unix)]
#[tokio::test]
async fn stderr_is_monitored_separately() {
    let config = SpawnConfig::new("sh -c 'echo out; echo err 1>&2'")
        .monitor_stdout(true)
        .monitor_stderr(true);
    let (tx, mut rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn sh");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.stdout, b"out\n");
    assert_eq!(events.stderr, b"err\n");
    assert_eq!(events.exits, vec![0]);
    expected_finished_handle(&handle, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn unmonitored_stderr_produces_no_events() {
    let config = SpawnConfig::new("sh -c 'echo out; echo err 1>&2'").monitor_stdout(true);
    let (tx, mut rx) = mpsc::channel(100);
    let _handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn sh");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.stdout, b"out\n");
    assert!(events.stderr.is_empty());
    assert_eq!(events.exits, vec![0]);
}

#[cfg(unix)]
#[tokio::test]
async fn large_output_is_delivered_in_order() {
    let config = SpawnConfig::new("sh -c 'i=0; while [ $i -lt 2000 ]; do echo line-$i; i=$((i+1)); done'")
        .monitor_stdout(true)
        .read_chunk_size(512);
    let (tx, mut rx) = mpsc::channel(16);
    let _handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn sh");

    let events = collect_events(&mut rx).await;
    let expected: String = (0..2000).map(|i| format!("line-{i}\n")).collect();
    assert_eq!(String::from_utf8_lossy(&events.stdout), expected);
    assert!(events.chunks > 1);
    assert_eq!(events.exits, vec![0]);
}
