use tokio::io::AsyncWriteExt;

use crate::process::{error::ControlError, signal::kill_process, tokio::handle::ProcessHandle};

impl ProcessHandle {
    /// Writes all of `data` to the child's stdin.
    ///
    /// Failures (child gone, stdin already closed) are only logged, matching
    /// pipe semantics where the reader may disappear at any time.
    pub async fn write(&self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        let mut stdin = self.shared_context.stdin.lock().await;
        let Some(stdin) = stdin.as_mut() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(len = data.len(), "Stdin is closed, dropping input");
            return;
        };
        if let Err(_e) = stdin.write_all(data).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Failed to write to child stdin");
            return;
        }
        if let Err(_e) = stdin.flush().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Failed to flush child stdin");
        }
    }

    /// Closes the child's stdin so it reads end of file. Later calls do nothing.
    pub async fn close_input(&self) {
        let closed = self.shared_context.stdin.lock().await.take();
        #[cfg(feature = "tracing")]
        if closed.is_some() {
            tracing::debug!(pid = self.process_id(), "Closed child stdin");
        }
        drop(closed);
    }

    /// Sends a signal to the child.
    ///
    /// On Unix `signal` is a POSIX signal number; `None` or `Some(0)` send
    /// `SIGKILL`. On Windows the child is always terminated forcibly with exit
    /// code 1, whatever signal is requested, since Windows offers no general
    /// signal delivery. Killing a child that already exited does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidSignal`] for an unknown Unix signal
    /// number and [`ControlError::Signal`] if the OS refuses delivery.
    pub fn kill(&self, signal: Option<i32>) -> Result<(), ControlError> {
        // A reaped pid may already belong to another process
        if !self.shared_context.is_live() || self.shared_context.has_exited() {
            #[cfg(feature = "tracing")]
            tracing::debug!(pid = self.process_id(), "Process already exited, not signaling");
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(pid = self.process_id(), ?signal, "Killing child process");
        kill_process(self.process_id(), signal)
    }
}
