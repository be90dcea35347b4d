//! In-memory sink that records notifications in arrival order.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{NotifyError, Result};
use crate::notification::OutboundNotification;

use super::NotificationSink;

pub struct MemorySink {
    delivered: Mutex<Vec<OutboundNotification>>,
    reject: AtomicBool,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            reject: AtomicBool::new(false),
        }
    }

    /// Sink that fails every send with a delivery error
    pub fn rejecting() -> Self {
        let sink = Self::new();
        sink.set_rejecting(true);
        sink
    }

    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Snapshot of everything delivered so far
    pub async fn delivered(&self) -> Vec<OutboundNotification> {
        self.delivered.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.delivered.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.delivered.lock().await.is_empty()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn send(&self, notification: OutboundNotification) -> Result<()> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery(format!(
                "memory sink rejected notification {}",
                notification.id
            )));
        }

        let mut delivered = self.delivered.lock().await;
        delivered.push(notification);

        tracing::debug!(total = delivered.len(), "Notification recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::template_notification;

    #[tokio::test]
    async fn test_records_in_order() {
        let sink = MemorySink::new();
        for message in ["one", "two", "three"] {
            sink.send(OutboundNotification::new(template_notification(message)))
                .await
                .unwrap();
        }

        let delivered = sink.delivered().await;
        let messages: Vec<_> = delivered
            .iter()
            .map(|n| n.payload.properties().unwrap().get("message").unwrap().to_string())
            .collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_rejecting_sink() {
        let sink = MemorySink::rejecting();
        let result = sink
            .send(OutboundNotification::new(template_notification("Hello")))
            .await;

        assert!(matches!(result, Err(NotifyError::Delivery(_))));
        assert!(sink.is_empty().await);

        sink.set_rejecting(false);
        sink.send(OutboundNotification::new(template_notification("Hello")))
            .await
            .unwrap();
        assert_eq!(sink.len().await, 1);
    }

    #[tokio::test]
    async fn test_send_all_stops_at_first_failure() {
        let sink = MemorySink::new();
        let notifications = vec![
            OutboundNotification::new(template_notification("a")),
            OutboundNotification::new(template_notification("b")),
        ];
        sink.send_all(notifications).await.unwrap();
        assert_eq!(sink.len().await, 2);

        sink.set_rejecting(true);
        let result = sink
            .send_all(vec![OutboundNotification::new(template_notification("c"))])
            .await;
        assert!(result.is_err());
        assert_eq!(sink.len().await, 2);
    }
}
