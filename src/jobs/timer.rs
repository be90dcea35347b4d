use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata handed to a timer job on each tick
#[derive(Debug, Clone, Serialize)]
pub struct TimerInfo {
    /// When this tick was due
    pub scheduled_at: DateTime<Utc>,
    /// When the job last ran, if it has
    pub last_fired: Option<DateTime<Utc>>,
    /// The tick fired noticeably later than it was due
    pub is_past_due: bool,
}

impl TimerInfo {
    /// Tick due right now, with no previous run
    pub fn now() -> Self {
        Self {
            scheduled_at: Utc::now(),
            last_fired: None,
            is_past_due: false,
        }
    }

    pub fn new(
        scheduled_at: DateTime<Utc>,
        last_fired: Option<DateTime<Utc>>,
        is_past_due: bool,
    ) -> Self {
        Self {
            scheduled_at,
            last_fired,
            is_past_due,
        }
    }
}
