//! Outbound notification delivery.

use tracing::info;

/// Fire-and-forget delivery of monitoring events to whatever surface
/// shows them. No return value is consumed and failures stay inside the
/// sink; a slow or broken sink must never stall a refresh cycle.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Sink that writes notifications to the tracing log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!(title = %title, message = %message, "notification");
    }
}
