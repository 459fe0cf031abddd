use std::{io, time::Duration};

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::ChildStdout,
};

use crate::process::error::ReadError;

/// How the stdout transport of a handle is consumed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutMode {
    /// Bytes are pushed to the event channel by the output monitor
    Streaming,
    /// Bytes stay in the pipe until the caller pulls them with a manual read
    Manual,
}

/// The parent's read end of the child's stdout.
///
/// In [`StdoutMode::Manual`] the stream owns the pipe plus the bytes that were
/// read from it but not yet returned to the caller. In
/// [`StdoutMode::Streaming`] the pipe belongs to the output monitor and this
/// stream stays empty.
#[derive(Debug)]
pub(crate) struct StdoutStream<R = ChildStdout> {
    mode: StdoutMode,
    pipe: Option<R>,
    pending: Vec<u8>,
    chunk_size: usize,
}

impl<R> StdoutStream<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn manual(pipe: R, chunk_size: usize) -> Self {
        Self {
            mode: StdoutMode::Manual,
            pipe: Some(pipe),
            pending: Vec::new(),
            chunk_size,
        }
    }

    pub(crate) fn streaming() -> Self {
        Self {
            mode: StdoutMode::Streaming,
            pipe: None,
            pending: Vec::new(),
            chunk_size: 0,
        }
    }

    pub(crate) fn mode(&self) -> StdoutMode {
        self.mode
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.pipe.is_none()
    }

    /// Reads one chunk from the pipe into the pending buffer.
    ///
    /// Returns `false` once the pipe reached end of stream or was closed.
    async fn fill(&mut self) -> io::Result<bool> {
        let Some(pipe) = self.pipe.as_mut() else {
            return Ok(false);
        };
        let mut buf = vec![0u8; self.chunk_size.max(1)];
        let result = loop {
            match pipe.read(&mut buf).await {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match result? {
            0 => {
                self.pipe = None;
                Ok(false)
            }
            n => {
                self.pending.extend_from_slice(&buf[..n]);
                Ok(true)
            }
        }
    }

    /// Reads one line.
    ///
    /// The final line is returned even without a terminator. Unless
    /// `keep_terminator` is set, one trailing `\n` or `\r\n` is removed.
    pub(crate) async fn read_line(
        &mut self,
        keep_terminator: bool,
    ) -> Result<Option<Vec<u8>>, ReadError> {
        let mut searched = 0;
        loop {
            if let Some(pos) = self.pending[searched..].iter().position(|b| *b == b'\n') {
                let mut line: Vec<u8> = self.pending.drain(..=searched + pos).collect();
                if !keep_terminator {
                    strip_line_terminator(&mut line);
                }
                return Ok(Some(line));
            }
            searched = self.pending.len();

            if !self.fill().await? {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.pending)));
            }
        }
    }

    /// Reads until end of stream and returns everything not yet consumed.
    pub(crate) async fn read_to_end(&mut self) -> Result<Option<Vec<u8>>, ReadError> {
        while self.fill().await? {}
        if self.pending.is_empty() {
            return Ok(None);
        }
        Ok(Some(std::mem::take(&mut self.pending)))
    }

    /// Reads up to `count` bytes, fewer only when end of stream is reached.
    pub(crate) async fn read_bytes(&mut self, count: usize) -> Result<Option<Vec<u8>>, ReadError> {
        if count == 0 {
            return Ok(Some(Vec::new()));
        }
        while self.pending.len() < count && self.fill().await? {}
        if self.pending.is_empty() {
            return Ok(None);
        }
        let take = count.min(self.pending.len());
        Ok(Some(self.pending.drain(..take).collect()))
    }

    /// Releases the pipe, keeping whatever the child already wrote.
    ///
    /// Bytes still in the pipe are moved to the pending buffer for up to
    /// `drain` so manual reads after exit see the complete output.
    pub(crate) async fn close(&mut self, drain: Duration) {
        let Some(mut pipe) = self.pipe.take() else {
            return;
        };
        let mut rest = Vec::new();
        match tokio::time::timeout(drain, pipe.read_to_end(&mut rest)).await {
            Ok(Ok(_)) => {}
            Ok(Err(_e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "Failed to drain stdout before closing");
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Stdout still open after drain timeout, closing anyway");
            }
        }
        self.pending.extend_from_slice(&rest);
    }
}

/// Removes exactly one trailing `\n` or `\r\n`.
pub(crate) fn strip_line_terminator(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}
