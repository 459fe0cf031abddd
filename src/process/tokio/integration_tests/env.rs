use tokio::sync::mpsc;

use crate::process::{
    config::SpawnConfig,
    tokio::{handle::ProcessHandle, integration_tests::helper::collect_events},
};

#[cfg(unix)]
#[tokio::test]
async fn explicit_env_replaces_inherited() {
    let path = std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string());
    let config = SpawnConfig::new(r#"sh -c 'echo "$TCRM_GREETING:$HOME"'"#)
        .env([format!("PATH={path}"), "TCRM_GREETING=a=b".to_string()])
        .monitor_stdout(true);
    let (tx, mut rx) = mpsc::channel(100);
    let _handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn sh");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.stdout, b"a=b:\n");
    assert_eq!(events.exits, vec![0]);
}

#[cfg(unix)]
#[tokio::test]
async fn env_var_builder_adds_to_explicit_env() {
    let config = SpawnConfig::new(r#"/bin/sh -c 'echo "$ONE $TWO"'"#)
        .env_var("ONE", "1")
        .env_var("TWO", "2")
        .monitor_stdout(true);
    let (tx, mut rx) = mpsc::channel(100);
    let _handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn sh");

    let events = collect_events(&mut rx).await;
    assert_eq!(events.stdout, b"1 2\n");
}

#[cfg(unix)]
#[tokio::test]
async fn working_dir_is_applied() {
    let dir = std::env::temp_dir()
        .canonicalize()
        .expect("Temp dir should resolve");
    let config = SpawnConfig::new("pwd -P")
        .working_dir(dir.to_string_lossy())
        .monitor_stdout(true);
    let (tx, mut rx) = mpsc::channel(100);
    let _handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn pwd");

    let events = collect_events(&mut rx).await;
    let printed = String::from_utf8_lossy(&events.stdout);
    assert_eq!(printed.trim_end(), dir.to_string_lossy());
}

#[cfg(windows)]
#[tokio::test]
async fn working_dir_is_applied() {
    let dir = std::env::temp_dir();
    let config = SpawnConfig::new("cd")
        .working_dir(dir.to_string_lossy())
        .monitor_stdout(true);
    let (tx, mut rx) = mpsc::channel(100);
    let _handle = ProcessHandle::spawn(config, tx)
        .await
        .expect("Failed to spawn cmd");

    let events = collect_events(&mut rx).await;
    let printed = String::from_utf8_lossy(&events.stdout);
    assert_eq!(
        printed.trim_end().trim_end_matches('\\').to_lowercase(),
        dir.to_string_lossy().trim_end_matches('\\').to_lowercase()
    );
}
