use async_trait::async_trait;

use crate::error::Result;
use crate::notification::OutboundNotification;

use super::NotificationSink;

/// Sink that only logs what it would deliver
pub struct LogSink {
    hub_name: String,
}

impl LogSink {
    pub fn new(hub_name: impl Into<String>) -> Self {
        Self {
            hub_name: hub_name.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: OutboundNotification) -> Result<()> {
        let tag_expression = notification
            .tag_expression
            .as_ref()
            .map(|t| t.as_str())
            .unwrap_or("<broadcast>");

        tracing::info!(
            hub = %self.hub_name,
            notification_id = %notification.id,
            kind = notification.payload.kind(),
            platform = %notification.target_platform(),
            tag_expression = %tag_expression,
            "Notification handed to hub"
        );

        if let Ok(body) = serde_json::to_string(&notification.payload) {
            tracing::debug!(notification_id = %notification.id, body = %body, "Notification body");
        }

        Ok(())
    }
}
