use std::io;

use thiserror::Error;

use crate::process::command::CommandLineError;

/// Errors that abort a spawn attempt.
///
/// A `SpawnError` is always returned before a [`ProcessHandle`] exists, so no
/// child is left running and no pipe endpoint is leaked.
///
/// [`ProcessHandle`]: crate::process::tokio::handle::ProcessHandle
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    #[error("Invalid command: {0}")]
    InvalidCommand(#[from] CommandLineError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to spawn child process: {0}")]
    Spawn(String),
}

/// Errors reported by manual reads of the stdout transport.
///
/// End of stream is not an error; it is reported as `Ok(None)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("Failed to read process output: {message} (code {code})")]
    Io { message: String, code: i32 },

    #[error("Stdout is streamed to the output monitor and cannot be read manually")]
    Streaming,
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io {
            message: err.to_string(),
            code: err.raw_os_error().unwrap_or(-1),
        }
    }
}

/// Errors from delivering a signal to the child.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Invalid signal number: {0}")]
    InvalidSignal(i32),

    #[error("Failed to signal process: {0}")]
    Signal(String),
}
