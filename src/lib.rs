//! # tcrm-process
//!
//! Asynchronous handles to child processes with piped standard streams.
//! Built for hosts that drive an event loop and need to run external commands
//! without blocking it.
//!
//! ## Features
//!
//! - **Output Events**: stdout/stderr chunks pushed to a channel as they arrive
//! - **Manual Reads**: pull stdout line by line, to the end, or by byte count
//! - **Stdin Support**: write to the child and close its input
//! - **Exactly-once Exit**: one exit event and one cleanup per process, even when
//!   end of output and process exit race
//! - **Blocking Wait**: wait from synchronous code while pumping the host loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tcrm_process::process::{
//!     config::SpawnConfig, event::ProcessEvent, tokio::handle::ProcessHandle,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SpawnConfig::new("echo 'Hello, World!'").monitor_stdout(true);
//!
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let handle = ProcessHandle::spawn(config, tx).await?;
//!
//!     while let Some(event) = rx.recv().await {
//!         match event {
//!             ProcessEvent::Output { data, .. } => print!("{}", String::from_utf8_lossy(&data)),
//!             ProcessEvent::Exited { status, .. } => {
//!                 println!("pid {} exited with {}", handle.process_id(), status);
//!                 break;
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command Lines
//!
//! On Unix the command line is split with shell word rules (quotes and
//! backslashes, no expansion) and the program is looked up in `PATH`. On
//! Windows it is run through `%COMSPEC% /c`.
//!
//! ## Optional Features
//!
//! - `tokio` (default): the runtime-backed [`ProcessHandle`](process::tokio::handle::ProcessHandle)
//! - `serde`: serialization support for configuration, events and errors
//! - `tracing`: structured logging integration

pub mod helper;
pub mod process;
