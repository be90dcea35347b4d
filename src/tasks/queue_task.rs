use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;

use crate::jobs::send_to_user_tag;
use crate::routing::{RoutingRecord, TagPattern};
use crate::sink::NotificationSink;

/// Background task feeding queue messages to the user-tag job
pub struct QueueTask {
    messages: ReceiverStream<String>,
    pattern: TagPattern,
    sink: Arc<dyn NotificationSink>,
    shutdown: broadcast::Receiver<()>,
}

impl QueueTask {
    /// Create a task reading raw JSON messages from `receiver`
    pub fn new(
        receiver: mpsc::Receiver<String>,
        pattern: TagPattern,
        sink: Arc<dyn NotificationSink>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            messages: ReceiverStream::new(receiver),
            pattern,
            sink,
            shutdown,
        }
    }

    /// Run until the shutdown signal or until every sender is dropped
    pub async fn run(mut self) {
        tracing::info!(
            pattern = %self.pattern,
            sink = self.sink.name(),
            "Queue job started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Queue job received shutdown signal");
                    break;
                }
                message = self.messages.next() => {
                    match message {
                        Some(raw) => Self::handle(&self.pattern, self.sink.as_ref(), &raw).await,
                        None => {
                            tracing::info!("Queue closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Queue job stopped");
    }

    /// Decode one message, run the job and deliver its output
    async fn handle(pattern: &TagPattern, sink: &dyn NotificationSink, raw: &str) {
        let record: RoutingRecord = match serde_json::from_str(raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse queue message");
                return;
            }
        };

        let notification = match send_to_user_tag(&record, pattern) {
            Ok(notification) => notification,
            Err(e) => {
                tracing::warn!(
                    code = e.code(),
                    error = %e,
                    user_name = %record.display_name,
                    "Skipping queue message"
                );
                return;
            }
        };

        let notification_id = notification.id;
        if let Err(e) = sink.send(notification).await {
            tracing::warn!(
                notification_id = %notification_id,
                sink = sink.name(),
                error = %e,
                "Failed to deliver queue job output"
            );
        }
    }
}
