//! Delivery sinks.
//!
//! A sink takes a finished [`OutboundNotification`] and owns transport,
//! retries and fan-out. This crate ships two in-process sinks:
//!
//! - `LogSink`: writes each notification to the tracing log
//! - `MemorySink`: records notifications in arrival order
//!
//! Handlers that produce several notifications either return them as an
//! ordered `Vec` or push them onto a [`NotificationBatch`] and flush it once.

mod batch;
mod log_sink;
mod memory_sink;

use async_trait::async_trait;

use crate::error::Result;
use crate::notification::OutboundNotification;

pub use batch::NotificationBatch;
pub use log_sink::LogSink;
pub use memory_sink::MemorySink;

/// Accepts finished notifications for delivery
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Name used in log fields
    fn name(&self) -> &str;

    /// Deliver one notification
    async fn send(&self, notification: OutboundNotification) -> Result<()>;

    /// Deliver notifications in order, stopping at the first failure
    async fn send_all(&self, notifications: Vec<OutboundNotification>) -> Result<()> {
        for notification in notifications {
            self.send(notification).await?;
        }
        Ok(())
    }
}
