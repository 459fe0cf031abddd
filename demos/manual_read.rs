//! Example: Pull stdout line by line instead of streaming it
use tcrm_process::process::{config::SpawnConfig, tokio::handle::ProcessHandle};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(windows)]
    let config = SpawnConfig::new("echo one&& echo two&& echo three");
    #[cfg(unix)]
    let config = SpawnConfig::new("sh -c 'echo one; echo two; echo three'");

    // Only the exit event arrives here since no stream is monitored
    let (event_tx, _event_rx) = mpsc::channel(100);
    let handle = ProcessHandle::spawn(config, event_tx).await?;

    let mut count = 0;
    while let Some(line) = handle.read_line().await? {
        count += 1;
        println!("Line {}: {}", count, String::from_utf8_lossy(&line));
    }

    let status = handle.wait().await;
    println!("Read {} lines, exit status {}", count, status);
    Ok(())
}
