pub mod handle;
pub mod handler;
pub mod reader;
pub mod transport;

pub(crate) mod context;
pub(crate) mod event;
pub(crate) mod input;
pub(crate) mod spawner;
