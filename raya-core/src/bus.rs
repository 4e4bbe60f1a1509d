use tokio::sync::broadcast;

use raya_shared::StudioEvent;

/// Same-process, multi-subscriber, fire-and-forget broadcast of booking
/// and message mutations. No replay: a receiver only sees events published
/// after it subscribed.
#[derive(Clone, Debug)]
pub struct NotificationBus {
    tx: broadcast::Sender<StudioEvent>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver to all current subscribers. Having no subscribers is not an
    /// error; the event is simply dropped.
    pub fn publish(&self, event: StudioEvent) {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(kind, receivers, "broadcast studio event");
            }
            Err(_) => {
                tracing::debug!(kind, "no subscribers for studio event");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.tx.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(100)
    }
}
