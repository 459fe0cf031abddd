use std::{io, sync::Arc};

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::process::{
    config::StreamSource,
    event::ProcessEvent,
    tokio::{context::ProcessContext, event::send_event, handler::cleanup::cleanup},
};

/// Output monitor for one stream.
///
/// Forwards every chunk read from `reader` as [`ProcessEvent::Output`] until
/// end of stream. Sending waits for room in the event channel, so a consumer
/// that stops receiving stalls the monitor and eventually the child. When it is the last monitor to finish after the child was
/// reaped, it runs the cleanup itself.
pub(crate) async fn monitor_output<R>(ctx: Arc<ProcessContext>, mut reader: R, src: StreamSource)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; ctx.config.read_chunk_size.max(1)];
    loop {
        if !ctx.is_live() {
            #[cfg(feature = "tracing")]
            tracing::trace!(?src, "Handle already cleaned up, output monitor stopping");
            ctx.deregister_output(src);
            return;
        }
        let len = match reader.read(&mut buf).await {
            Ok(0) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?src, "Output stream reached end of stream");
                break;
            }
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(?src, error = %_e, "Error reading output stream");
                break;
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(?src, len, "Output chunk");

        if !ctx.is_live() {
            ctx.deregister_output(src);
            return;
        }
        // A full channel must not look like an idle pipe to the exit monitor
        ctx.begin_send();
        send_event(
            &ctx.event_tx,
            ProcessEvent::Output {
                src,
                data: buf[..len].to_vec(),
            },
        )
        .await;
        ctx.end_send();
    }

    // Deregister before cleanup so cleanup never aborts the running task
    ctx.deregister_output(src);
    if !ctx.finish_monitor() {
        return;
    }
    if let Some(termination) = ctx.get_termination() {
        cleanup(&ctx, termination).await;
    }
}
