use tokio::sync::mpsc;

use crate::process::{
    config::SpawnConfig,
    tokio::{
        handle::{ProcessHandle, wait_all},
        integration_tests::helper::expected_finished_handle,
    },
};

#[cfg(unix)]
fn exit_with(code: i32) -> SpawnConfig {
    SpawnConfig::new(format!("sh -c 'exit {code}'"))
}

#[cfg(windows)]
fn exit_with(code: i32) -> SpawnConfig {
    SpawnConfig::new(format!("exit /b {code}"))
}

#[tokio::test]
async fn wait_returns_exit_status() {
    let (tx, _rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(exit_with(4), tx)
        .await
        .expect("Failed to spawn shell");

    assert_eq!(handle.wait().await, 4);
    // Waiting again returns the stored status
    assert_eq!(handle.wait().await, 4);
    expected_finished_handle(&handle, 4);
}

#[tokio::test]
async fn wait_all_keeps_handle_order() {
    let (tx, _rx) = mpsc::channel(100);
    let mut handles = Vec::new();
    for code in [2, 0, 7] {
        let handle = ProcessHandle::spawn(exit_with(code), tx.clone())
            .await
            .expect("Failed to spawn shell");
        handles.push(handle);
    }

    assert_eq!(wait_all(&handles).await, vec![2, 0, 7]);
    assert!(handles.iter().all(|h| !h.is_running()));
}

#[test]
fn wait_blocking_pumps_host_loop() {
    let mut runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    let config = exit_with(5).monitor_stdout(true).monitor_stderr(true);
    let (tx, mut rx) = mpsc::channel(100);
    let handle = runtime
        .block_on(ProcessHandle::spawn(config, tx))
        .expect("Failed to spawn shell");

    assert_eq!(handle.wait_blocking(&mut runtime), 5);
    expected_finished_handle(&handle, 5);

    let mut exits = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, crate::process::event::ProcessEvent::Exited { status: 5, .. }) {
            exits += 1;
        }
    }
    assert_eq!(exits, 1);
}

#[test]
fn wait_blocking_after_exit_returns_immediately() {
    let mut runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    let (tx, _rx) = mpsc::channel(100);
    let handle = runtime
        .block_on(async {
            let handle = ProcessHandle::spawn(exit_with(0), tx).await?;
            handle.wait().await;
            Ok::<_, crate::process::error::SpawnError>(handle)
        })
        .expect("Failed to spawn shell");

    assert_eq!(handle.wait_blocking(&mut runtime), 0);
}
