use std::time::Duration;

/// How long one [`HostLoop::pump`] drives a tokio runtime.
pub const PUMP_INTERVAL: Duration = Duration::from_millis(10);

/// An event loop owned by the caller that can be driven from synchronous code.
///
/// Blocking waits such as
/// [`ProcessHandle::wait_blocking`](crate::process::tokio::handle::ProcessHandle::wait_blocking)
/// call `pump` repeatedly instead of sleeping, so readiness and exit
/// notifications of every spawned process keep flowing while the caller waits.
pub trait HostLoop {
    /// Processes pending events, returning after a short bounded time.
    fn pump(&mut self);
}

/// Drives the runtime for [`PUMP_INTERVAL`].
///
/// Must not be called from inside an async context of the same runtime.
#[cfg(feature = "tokio")]
impl HostLoop for tokio::runtime::Runtime {
    fn pump(&mut self) {
        // The timer must be created inside the runtime context
        self.block_on(async { tokio::time::sleep(PUMP_INTERVAL).await });
    }
}
