//! Example: Print tracing messages
use tcrm_process::process::{
    config::SpawnConfig, event::ProcessEvent, tokio::handle::ProcessHandle,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    #[cfg(windows)]
    let config = SpawnConfig::new("echo Hello!").monitor_stdout(true);
    #[cfg(unix)]
    let config = SpawnConfig::new("sh -c 'echo Hello!; sleep 10'").monitor_stdout(true);

    let (event_tx, mut event_rx) = mpsc::channel::<ProcessEvent>(100);
    let handle = ProcessHandle::spawn(config, event_tx).await?;
    while let Some(event) = event_rx.recv().await {
        match event {
            ProcessEvent::Output { data, .. } => {
                print!("Output: {}", String::from_utf8_lossy(&data));
                handle.kill(None)?;
            }
            ProcessEvent::Exited { status, .. } => {
                println!("Exited with status {}", status);
                break;
            }
        }
    }
    Ok(())
}
