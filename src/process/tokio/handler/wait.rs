use std::{process::ExitStatus, sync::Arc, time::Duration};

use tokio::process::Child;

use crate::process::tokio::{
    context::{ProcessContext, Termination},
    handler::cleanup::cleanup,
};

/// Status reported for a child that did not exit normally.
pub const ABNORMAL_EXIT_STATUS: i32 = 1;

/// Converts an OS exit status to the single integer reported to callers.
///
/// A normal exit yields its exit code. On Unix a child terminated by a signal
/// has no exit code and yields [`ABNORMAL_EXIT_STATUS`]. On Windows the
/// reported exit code is always available and used as is.
///
/// # Examples
///
/// ```rust,no_run
/// use tcrm_process::process::tokio::handler::wait::normalize_exit_status;
///
/// let status = std::process::Command::new("true").status().unwrap();
/// assert_eq!(normalize_exit_status(status), 0);
/// ```
pub fn normalize_exit_status(status: ExitStatus) -> i32 {
    status.code().unwrap_or(ABNORMAL_EXIT_STATUS)
}

pub(crate) fn termination_from(status: ExitStatus) -> Termination {
    #[cfg(unix)]
    use std::os::unix::process::ExitStatusExt;

    Termination {
        status: normalize_exit_status(status),
        #[cfg(unix)]
        signal: status.signal(),
    }
}

/// Exit monitor.
///
/// Waits for the child, records how it terminated, lets the output monitors
/// drain, then runs the cleanup.
pub(crate) async fn monitor_exit(ctx: Arc<ProcessContext>, mut child: Child) {
    let termination = match child.wait().await {
        Ok(status) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(exit_code = ?status.code(), "Child process exited");
            termination_from(status)
        }
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %_e, "Failed to wait for child process");
            Termination {
                status: ABNORMAL_EXIT_STATUS,
                #[cfg(unix)]
                signal: None,
            }
        }
    };
    drop(child);
    ctx.set_termination(termination);

    wait_for_output_monitors(&ctx).await;

    ctx.deregister_exit();
    cleanup(&ctx, termination).await;
}

/// Waits until every output monitor reached end of stream, or until none of
/// them made progress for the configured drain timeout.
///
/// Only monitors idle in a pipe read can time out. A monitor waiting for room
/// in the event channel keeps the wait going, so no read output is dropped.
async fn wait_for_output_monitors(ctx: &ProcessContext) {
    let idle = Duration::from_millis(ctx.config.drain_timeout_ms);
    loop {
        if ctx.active_monitors() == 0 {
            return;
        }
        tokio::select! {
            _ = ctx.monitors_drained() => return,
            _ = ctx.output_progress() => continue,
            _ = tokio::time::sleep(idle) => {
                if ctx.sending_monitors() > 0 {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("Event channel full, output monitors still busy");
                    continue;
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    active = ctx.active_monitors(),
                    "Output still open after child exited, cleaning up anyway"
                );
                return;
            }
        }
    }
}
