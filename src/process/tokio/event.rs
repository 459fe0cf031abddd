use tokio::sync::mpsc;

use crate::process::event::ProcessEvent;

/// Sends an event, logging instead of failing when the receiver is gone.
pub(crate) async fn send_event(event_tx: &mpsc::Sender<ProcessEvent>, event: ProcessEvent) {
    if let Err(_e) = event_tx.send(event).await {
        #[cfg(feature = "tracing")]
        tracing::warn!(event = ?_e.0, "Event channel closed");
    }
}
