use std::sync::Arc;

use crate::process::{
    config::SpawnConfig,
    host::HostLoop,
    tokio::{context::ProcessContext, transport::StdoutMode},
};

/// Handle to one spawned child process
///
/// A `ProcessHandle` owns the parent's ends of the child's stdin, stdout and
/// stderr pipes. It is created by [`ProcessHandle::spawn`], which also starts
/// an exit monitor and, on request, output monitors that push stdout/stderr
/// chunks to the event channel. Once the child exits, the monitors clean up:
/// every pipe is closed, the exit status is stored, and exactly one
/// [`ProcessEvent::Exited`](crate::process::event::ProcessEvent::Exited) is
/// sent.
///
/// Dropping the handle does not stop the child; the monitors keep running
/// until it exits. Use [`ProcessHandle::kill`] to stop it.
///
/// # Examples
///
/// ## Streaming output
/// ```rust,no_run
/// use tcrm_process::process::{
///     config::SpawnConfig, event::ProcessEvent, tokio::handle::ProcessHandle,
/// };
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SpawnConfig::new("ls -la")
///         .monitor_stdout(true)
///         .monitor_stderr(true);
///
///     let (tx, mut rx) = mpsc::channel(100);
///     let handle = ProcessHandle::spawn(config, tx).await?;
///     println!("spawned {}", handle.process_id());
///
///     while let Some(event) = rx.recv().await {
///         if let ProcessEvent::Output { data, .. } = event {
///             print!("{}", String::from_utf8_lossy(&data));
///         }
///     }
///     println!("exit status {:?}", handle.exit_status());
///     Ok(())
/// }
/// ```
///
/// ## Manual reads
/// ```rust,no_run
/// use tcrm_process::process::{config::SpawnConfig, tokio::handle::ProcessHandle};
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (tx, _rx) = mpsc::channel(100);
///     let handle = ProcessHandle::spawn(SpawnConfig::new("cat"), tx).await?;
///
///     handle.write(b"first\nsecond\n").await;
///     handle.close_input().await;
///
///     while let Some(line) = handle.read_line().await? {
///         println!("{}", String::from_utf8_lossy(&line));
///     }
///     assert_eq!(handle.wait().await, 0);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ProcessHandle {
    pub(crate) shared_context: Arc<ProcessContext>,
}

impl ProcessHandle {
    pub(crate) fn from_context(shared_context: Arc<ProcessContext>) -> Self {
        Self { shared_context }
    }

    /// OS process id of the child.
    pub fn process_id(&self) -> u32 {
        self.shared_context.process_id()
    }

    /// `true` from a successful spawn until cleanup has run.
    pub fn is_running(&self) -> bool {
        self.shared_context.is_live()
    }

    /// Normalized exit status, available once cleanup has run.
    pub fn exit_status(&self) -> Option<i32> {
        self.shared_context.get_exit_status()
    }

    /// Configuration this handle was spawned with.
    pub fn config(&self) -> &SpawnConfig {
        &self.shared_context.config
    }

    /// Whether stdout is streamed to the event channel or read manually.
    pub async fn stdout_mode(&self) -> StdoutMode {
        self.shared_context.stdout.lock().await.mode()
    }

    /// Waits until the child exited and cleanup ran, returning the normalized
    /// exit status.
    pub async fn wait(&self) -> i32 {
        let mut rx = self.shared_context.subscribe_exit_status();
        let result = rx.wait_for(Option::is_some).await.map(|status| *status);
        match result {
            Ok(Some(status)) => status,
            // The sender lives in the context this handle keeps alive
            _ => self
                .exit_status()
                .unwrap_or(crate::process::tokio::handler::wait::ABNORMAL_EXIT_STATUS),
        }
    }

    /// Blocks the current thread until cleanup ran, pumping `host` so pending
    /// readiness and exit notifications keep being processed.
    ///
    /// Must be called from synchronous code, outside the runtime that drives
    /// the monitors.
    ///
    /// Output monitors wait for room in the event channel. If stdout or stderr
    /// is monitored, something must keep receiving events while this call
    /// pumps, typically a task spawned on the same runtime. Otherwise the
    /// monitor stalls, the child blocks writing to a full pipe and this call
    /// never returns.
    ///
    /// The exit status is stored before [`ProcessEvent::Exited`] is sent. When
    /// the channel is full at that point, the exit event is only delivered
    /// once the runtime runs again after this call returned.
    ///
    /// [`ProcessEvent::Exited`]: crate::process::event::ProcessEvent::Exited
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tcrm_process::process::{config::SpawnConfig, tokio::handle::ProcessHandle};
    /// use tokio::sync::mpsc;
    ///
    /// let mut runtime = tokio::runtime::Builder::new_current_thread()
    ///     .enable_all()
    ///     .build()
    ///     .unwrap();
    /// let (tx, _rx) = mpsc::channel(16);
    /// let handle = runtime
    ///     .block_on(ProcessHandle::spawn(SpawnConfig::new("echo ok"), tx))
    ///     .unwrap();
    /// assert_eq!(handle.wait_blocking(&mut runtime), 0);
    /// ```
    pub fn wait_blocking<H: HostLoop>(&self, host: &mut H) -> i32 {
        loop {
            if let Some(status) = self.exit_status() {
                return status;
            }
            host.pump();
        }
    }
}

/// Waits for every handle and returns their exit statuses in order.
pub async fn wait_all(handles: &[ProcessHandle]) -> Vec<i32> {
    futures::future::join_all(handles.iter().map(ProcessHandle::wait)).await
}
