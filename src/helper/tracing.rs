use std::future::Future;

#[cfg(feature = "tracing")]
use tracing::{Instrument, Level};

/// Attaches a debug span to monitor futures when the `tracing` feature is on.
pub trait MaybeInstrument: Future + Sized {
    #[cfg(feature = "tracing")]
    fn maybe_instrument(
        self,
        monitor: &'static str,
        process_id: u32,
    ) -> impl Future<Output = Self::Output> {
        let span = tracing::span!(Level::DEBUG, "process_monitor", monitor, pid = process_id);
        self.instrument(span)
    }

    #[cfg(not(feature = "tracing"))]
    fn maybe_instrument(self, _monitor: &'static str, _process_id: u32) -> Self {
        self
    }
}

impl<F: Future> MaybeInstrument for F {}
