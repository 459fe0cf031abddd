use crate::process::{
    config::StreamSource,
    error::ReadError,
    tokio::{handle::ProcessHandle, transport::StdoutMode},
};

/// What a manual read of stdout returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// One line with its trailing `\n` or `\r\n` removed
    Line,
    /// One line including its terminator
    LineWithTerminator,
    /// Everything until end of stream
    ToEnd,
    /// Up to the given number of bytes
    Bytes(usize),
}

impl ProcessHandle {
    /// Reads from the child's stdout.
    ///
    /// Returns `Ok(None)` at end of stream. Output written before the child
    /// exited stays readable after exit.
    ///
    /// # Errors
    ///
    /// - [`ReadError::Streaming`] if stdout is delivered to an active output
    ///   monitor
    /// - [`ReadError::Io`] if the OS read fails
    pub async fn read(&self, mode: ReadMode) -> Result<Option<Vec<u8>>, ReadError> {
        let mut stdout = self.shared_context.stdout.lock().await;
        if stdout.mode() == StdoutMode::Streaming {
            if self.shared_context.is_monitored(StreamSource::Stdout) {
                return Err(ReadError::Streaming);
            }
            return Ok(None);
        }

        let result = match mode {
            ReadMode::Line => stdout.read_line(false).await,
            ReadMode::LineWithTerminator => stdout.read_line(true).await,
            ReadMode::ToEnd => stdout.read_to_end().await,
            ReadMode::Bytes(count) => stdout.read_bytes(count).await,
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(Some(bytes)) => tracing::trace!(?mode, len = bytes.len(), "Manual read"),
            Ok(None) => tracing::trace!(?mode, "Manual read reached end of stream"),
            Err(e) => tracing::warn!(?mode, error = %e, "Manual read failed"),
        }
        result
    }

    /// Reads one line, without its terminator.
    pub async fn read_line(&self) -> Result<Option<Vec<u8>>, ReadError> {
        self.read(ReadMode::Line).await
    }

    /// Reads everything until end of stream.
    pub async fn read_to_end(&self) -> Result<Option<Vec<u8>>, ReadError> {
        self.read(ReadMode::ToEnd).await
    }

    /// Reads up to `count` bytes.
    pub async fn read_bytes(&self, count: usize) -> Result<Option<Vec<u8>>, ReadError> {
        self.read(ReadMode::Bytes(count)).await
    }
}
