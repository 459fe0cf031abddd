use std::{sync::Arc, time::Duration};

use crate::process::{
    event::ProcessEvent,
    tokio::{
        context::{ProcessContext, Termination},
        event::send_event,
    },
};

/// Finalizes a handle: deregisters monitors, closes every transport, stores
/// the exit status and emits [`ProcessEvent::Exited`].
///
/// Only the first call per handle does anything; it returns `true`. Later
/// calls, including ones racing from another monitor, return `false`.
pub(crate) async fn cleanup(ctx: &Arc<ProcessContext>, termination: Termination) -> bool {
    if !ctx.take_live() {
        #[cfg(feature = "tracing")]
        tracing::trace!(pid = ctx.process_id(), "Process already cleaned up");
        return false;
    }
    ctx.count_cleanup_run();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        pid = ctx.process_id(),
        status = termination.status,
        "Cleaning up process"
    );

    let registered = {
        let mut registrations = ctx.registrations();
        [
            registrations.stdout.take(),
            registrations.stderr.take(),
            registrations.exit.take(),
        ]
    };
    for handle in registered.into_iter().flatten() {
        handle.abort();
    }

    ctx.stdin.lock().await.take();
    ctx.stdout
        .lock()
        .await
        .close(Duration::from_millis(ctx.config.drain_timeout_ms))
        .await;
    ctx.stderr.lock().await.take();

    ctx.set_exit_status(termination.status);
    send_event(
        &ctx.event_tx,
        ProcessEvent::Exited {
            process_id: ctx.process_id(),
            status: termination.status,
            #[cfg(unix)]
            signal: termination.signal,
        },
    )
    .await;
    true
}
