use std::sync::{
    Mutex as StdMutex, OnceLock,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use tokio::{
    process::{ChildStderr, ChildStdin},
    sync::{Mutex, Notify, mpsc, watch},
    task::AbortHandle,
};

use crate::process::{
    config::{SpawnConfig, StreamSource},
    event::ProcessEvent,
    tokio::transport::StdoutStream,
};

/// How the child terminated, as reported by the exit monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Termination {
    pub(crate) status: i32,
    #[cfg(unix)]
    pub(crate) signal: Option<i32>,
}

/// Monitor tasks currently registered for a handle.
#[derive(Debug, Default)]
pub(crate) struct Registrations {
    pub(crate) stdout: Option<AbortHandle>,
    pub(crate) stderr: Option<AbortHandle>,
    pub(crate) exit: Option<AbortHandle>,
}

/// State shared between a [`ProcessHandle`] and its monitor tasks.
///
/// [`ProcessHandle`]: crate::process::tokio::handle::ProcessHandle
#[derive(Debug)]
pub(crate) struct ProcessContext {
    pub(crate) config: SpawnConfig,
    process_id: u32,
    live: AtomicBool,
    exit_status: watch::Sender<Option<i32>>,
    termination: OnceLock<Termination>,
    active_monitors: AtomicUsize,
    sending_monitors: AtomicUsize,
    monitors_drained: Notify,
    output_progress: Notify,
    registrations: StdMutex<Registrations>,
    cleanup_runs: AtomicUsize,
    pub(crate) event_tx: mpsc::Sender<ProcessEvent>,

    pub(crate) stdin: Mutex<Option<ChildStdin>>,
    pub(crate) stdout: Mutex<StdoutStream>,
    pub(crate) stderr: Mutex<Option<ChildStderr>>,
}

impl ProcessContext {
    pub(crate) fn new(
        config: SpawnConfig,
        process_id: u32,
        event_tx: mpsc::Sender<ProcessEvent>,
        stdin: Option<ChildStdin>,
        stdout: StdoutStream,
        stderr: Option<ChildStderr>,
    ) -> Self {
        let (exit_status, _) = watch::channel(None);
        Self {
            config,
            process_id,
            live: AtomicBool::new(true),
            exit_status,
            termination: OnceLock::new(),
            active_monitors: AtomicUsize::new(0),
            sending_monitors: AtomicUsize::new(0),
            monitors_drained: Notify::new(),
            output_progress: Notify::new(),
            registrations: StdMutex::new(Registrations::default()),
            cleanup_runs: AtomicUsize::new(0),
            event_tx,
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(stdout),
            stderr: Mutex::new(stderr),
        }
    }

    pub(crate) fn process_id(&self) -> u32 {
        self.process_id
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Clears the liveness flag, returning whether this call was the one that
    /// cleared it.
    pub(crate) fn take_live(&self) -> bool {
        self.live.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn get_exit_status(&self) -> Option<i32> {
        *self.exit_status.borrow()
    }

    pub(crate) fn set_exit_status(&self, status: i32) {
        self.exit_status.send_replace(Some(status));
    }

    pub(crate) fn subscribe_exit_status(&self) -> watch::Receiver<Option<i32>> {
        self.exit_status.subscribe()
    }

    /// Whether the exit monitor has reaped the child.
    pub(crate) fn has_exited(&self) -> bool {
        self.termination.get().is_some()
    }

    pub(crate) fn get_termination(&self) -> Option<Termination> {
        self.termination.get().copied()
    }

    pub(crate) fn set_termination(&self, termination: Termination) {
        if self.termination.set(termination).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!(pid = self.process_id, "Termination already recorded");
        }
    }

    pub(crate) fn cleanup_runs(&self) -> usize {
        self.cleanup_runs.load(Ordering::SeqCst)
    }

    pub(crate) fn count_cleanup_run(&self) {
        self.cleanup_runs.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn set_active_monitors(&self, count: usize) {
        self.active_monitors.store(count, Ordering::SeqCst);
    }

    pub(crate) fn active_monitors(&self) -> usize {
        self.active_monitors.load(Ordering::SeqCst)
    }

    /// Marks one output monitor as finished.
    ///
    /// Returns `true` for the monitor that finished last.
    pub(crate) fn finish_monitor(&self) -> bool {
        let last = self
            .active_monitors
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            == Ok(1);
        if last {
            self.monitors_drained.notify_one();
        }
        last
    }

    pub(crate) async fn monitors_drained(&self) {
        if self.active_monitors() == 0 {
            return;
        }
        self.monitors_drained.notified().await;
    }

    /// Marks an output monitor as holding a chunk it has not delivered yet.
    pub(crate) fn begin_send(&self) {
        self.sending_monitors.fetch_add(1, Ordering::SeqCst);
    }

    /// Counterpart of [`ProcessContext::begin_send`]; also counts as progress.
    pub(crate) fn end_send(&self) {
        self.sending_monitors.fetch_sub(1, Ordering::SeqCst);
        self.note_output_progress();
    }

    /// Number of output monitors waiting for room in the event channel.
    pub(crate) fn sending_monitors(&self) -> usize {
        self.sending_monitors.load(Ordering::SeqCst)
    }

    pub(crate) fn note_output_progress(&self) {
        self.output_progress.notify_one();
    }

    pub(crate) async fn output_progress(&self) {
        self.output_progress.notified().await;
    }

    pub(crate) fn registrations(&self) -> std::sync::MutexGuard<'_, Registrations> {
        self.registrations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn is_monitored(&self, src: StreamSource) -> bool {
        let registrations = self.registrations();
        match src {
            StreamSource::Stdout => registrations.stdout.is_some(),
            StreamSource::Stderr => registrations.stderr.is_some(),
        }
    }

    /// Removes an output monitor registration without aborting it.
    pub(crate) fn deregister_output(&self, src: StreamSource) -> Option<AbortHandle> {
        let mut registrations = self.registrations();
        match src {
            StreamSource::Stdout => registrations.stdout.take(),
            StreamSource::Stderr => registrations.stderr.take(),
        }
    }

    /// Removes the exit monitor registration without aborting it.
    pub(crate) fn deregister_exit(&self) -> Option<AbortHandle> {
        self.registrations().exit.take()
    }
}
