use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::jobs::{TimerInfo, TimerJob};
use crate::sink::NotificationSink;

/// A tick later than this counts as past due
const PAST_DUE_THRESHOLD_MS: i64 = 1000;

/// Shortest period a timer job may run on
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Longest period a timer job may run on (one year)
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Background task running one timer job on its period
pub struct TimerTask {
    job: TimerJob,
    period: Duration,
    sink: Arc<dyn NotificationSink>,
    shutdown: broadcast::Receiver<()>,
}

impl TimerTask {
    /// Create a task running `job` on its own period
    pub fn new(
        job: TimerJob,
        sink: Arc<dyn NotificationSink>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self::with_period(job, job.period, sink, shutdown)
    }

    /// Create a task running `job` on an explicit period, clamped to 1ms..=1 year
    pub fn with_period(
        job: TimerJob,
        period: Duration,
        sink: Arc<dyn NotificationSink>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        let clamped = clamp_period(period);
        if clamped != period {
            tracing::warn!(
                job = job.name,
                requested_ms = period.as_millis() as u64,
                period_ms = clamped.as_millis() as u64,
                "Timer period out of range, clamped"
            );
        }

        Self {
            job,
            period: clamped,
            sink,
            shutdown,
        }
    }

    /// Period the task actually runs on
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until the shutdown signal
    pub async fn run(mut self) {
        let mut timer = tokio::time::interval(self.period);
        // Skip immediate first tick
        timer.tick().await;

        let period = period_as_chrono(self.period);
        let mut last_fired: Option<DateTime<Utc>> = None;
        let mut next_due = Utc::now() + period;

        tracing::info!(
            job = self.job.name,
            period_ms = self.period.as_millis() as u64,
            sink = self.sink.name(),
            "Timer job started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!(job = self.job.name, "Timer job received shutdown signal");
                    break;
                }
                _ = timer.tick() => {
                    let fired_at = Utc::now();
                    let info = tick_info(next_due, last_fired, fired_at);

                    self.fire(&info).await;

                    last_fired = Some(fired_at);
                    next_due = fired_at + period;
                }
            }
        }

        tracing::info!(job = self.job.name, "Timer job stopped");
    }

    /// Run the job once and flush its batch to the sink
    async fn fire(&self, info: &TimerInfo) {
        if info.is_past_due {
            tracing::warn!(
                job = self.job.name,
                scheduled_at = %info.scheduled_at,
                "Timer job is past due"
            );
        }

        let batch = match self.job.run(info) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!(job = self.job.name, code = e.code(), error = %e, "Timer job failed");
                return;
            }
        };

        match batch.flush(self.sink.as_ref()).await {
            Ok(count) => {
                tracing::debug!(job = self.job.name, count, "Timer job output delivered");
            }
            Err(e) => {
                tracing::warn!(
                    job = self.job.name,
                    sink = self.sink.name(),
                    error = %e,
                    "Failed to deliver timer job output"
                );
            }
        }
    }
}

fn clamp_period(period: Duration) -> Duration {
    period.clamp(MIN_PERIOD, MAX_PERIOD)
}

fn period_as_chrono(period: Duration) -> chrono::Duration {
    chrono::Duration::from_std(clamp_period(period)).unwrap_or_else(|_| chrono::Duration::days(365))
}

/// Timer metadata for a tick that fired at `fired_at`
fn tick_info(
    next_due: DateTime<Utc>,
    last_fired: Option<DateTime<Utc>>,
    fired_at: DateTime<Utc>,
) -> TimerInfo {
    let is_past_due = (fired_at - next_due).num_milliseconds() > PAST_DUE_THRESHOLD_MS;
    TimerInfo::new(next_due, last_fired, is_past_due)
}
