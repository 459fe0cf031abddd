use crate::process::config::StreamSource;

/// Events emitted while a child process is monitored
///
/// Every successful spawn produces any number of `Output` events (only for the
/// streams that were requested to be monitored) followed by exactly one
/// `Exited` event.
///
/// # Examples
///
/// ```rust,no_run
/// use tcrm_process::process::{
///     config::SpawnConfig, event::ProcessEvent, tokio::handle::ProcessHandle,
/// };
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SpawnConfig::new("echo hello world").monitor_stdout(true);
///
///     let (tx, mut rx) = mpsc::channel(100);
///     let _handle = ProcessHandle::spawn(config, tx).await?;
///
///     while let Some(event) = rx.recv().await {
///         match event {
///             ProcessEvent::Output { data, src } => {
///                 println!("{:?}: {}", src, String::from_utf8_lossy(&data));
///             }
///             ProcessEvent::Exited { status, .. } => {
///                 println!("exited with {}", status);
///                 break;
///             }
///         }
///     }
///     Ok(())
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A chunk of raw bytes read from a monitored stream
    ///
    /// Chunks follow read boundaries, not line boundaries.
    Output { src: StreamSource, data: Vec<u8> },

    /// The child terminated and its handle has been cleaned up
    Exited {
        process_id: u32,
        /// Normalized exit status, see [`normalize_exit_status`](crate::process::tokio::handler::wait::normalize_exit_status)
        status: i32,
        /// Terminating signal when the child was killed by one
        #[cfg(unix)]
        signal: Option<i32>,
    },
}
