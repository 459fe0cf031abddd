pub(crate) mod cleanup;
pub(crate) mod output;
pub mod wait;
