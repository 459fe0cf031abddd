//! Example: Stream output of a child fed through stdin
use tcrm_process::process::{
    config::SpawnConfig, event::ProcessEvent, tokio::handle::ProcessHandle,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(windows)]
    let config = SpawnConfig::new("sort").monitor_stdout(true);
    #[cfg(unix)]
    let config = SpawnConfig::new("cat").monitor_stdout(true);

    let (event_tx, mut event_rx) = mpsc::channel::<ProcessEvent>(100);
    let handle = ProcessHandle::spawn(config, event_tx).await?;
    println!("Process started with PID: {}", handle.process_id());

    handle.write("Hello from stdin!\n").await;
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    handle.write("Second line\n").await;

    // The child exits once it reads end of file
    handle.close_input().await;

    while let Some(event) = event_rx.recv().await {
        match event {
            ProcessEvent::Output { src, data } => {
                print!("{:?}: {}", src, String::from_utf8_lossy(&data));
            }
            ProcessEvent::Exited { status, .. } => {
                println!("Exited with status {}", status);
                break;
            }
        }
    }
    Ok(())
}
