pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod signal;

#[cfg(feature = "tokio")]
pub mod tokio;
