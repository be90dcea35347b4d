use crate::error::Result;
use crate::notification::{NotificationPayload, OutboundNotification};

use super::NotificationSink;

/// Ordered accumulator with a single commit point.
///
/// Nothing reaches a sink until [`NotificationBatch::flush`], which sends in
/// push order and consumes the batch.
#[derive(Debug, Default)]
pub struct NotificationBatch {
    items: Vec<OutboundNotification>,
}

impl NotificationBatch {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, notification: OutboundNotification) {
        self.items.push(notification);
    }

    /// Push a broadcast notification for the payload
    pub fn push_payload(&mut self, payload: impl Into<NotificationPayload>) {
        self.push(OutboundNotification::new(payload));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutboundNotification> {
        self.items.iter()
    }

    /// Send everything in push order. Returns the number delivered.
    pub async fn flush(self, sink: &dyn NotificationSink) -> Result<usize> {
        let count = self.items.len();
        if count == 0 {
            return Ok(0);
        }

        sink.send_all(self.items).await?;

        tracing::debug!(sink = sink.name(), count, "Notification batch flushed");
        Ok(count)
    }
}

impl Extend<OutboundNotification> for NotificationBatch {
    fn extend<I: IntoIterator<Item = OutboundNotification>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
