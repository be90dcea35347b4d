//! Notification hub jobs.
//!
//! Each job is a plain function: it receives its trigger input and returns the
//! notifications it wants sent. Nothing is delivered as a side effect; the
//! host hands the return value to a sink.
//!
//! | Job | Trigger | Output |
//! |-----|---------|--------|
//! | `send_template_notification` | every 15s | template `Hello` |
//! | `send_windows_toast` | every 30s | raw WNS toast |
//! | `send_template_from_string` | every 15s | template parsed from JSON |
//! | `send_to_user_tag` | queue | template routed by user tag |
//! | `send_windows_toast_from_string` | every 45s | WNS string payload |
//! | `send_notification_batch` | every 30s | `Message1`, `Message2` |
//! | `send_with_batch` | every 15s | `Hello`, `World` via a batch |
//! | `send_template_properties` | every 15s | template properties `Hello` |

mod timer;

use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::notification::{OutboundNotification, Platform, TemplateProperties};
use crate::routing::{RoutingRecord, TagPattern};
use crate::sink::NotificationBatch;
use crate::template::{
    build_raw_payload, build_template, parse_template_properties, payload_from_output_string,
    template_notification,
};

pub use timer::TimerInfo;

/// ToastText01 toast shown by the Windows jobs
pub const WINDOWS_TOAST: &str = "<toast><visual><binding template=\"ToastText01\"><text id=\"1\">Test message</text></binding></visual></toast>";

/// Template properties sent by the string-output jobs
pub const HELLO_FROM_REDMOND: &str = r#"{"message":"Hello","location":"Redmond"}"#;

/// Template notification `{"message": "Hello"}` to every template registration
pub fn send_template_notification(_timer: &TimerInfo) -> OutboundNotification {
    OutboundNotification::new(template_notification("Hello"))
}

/// Native Windows toast broadcast to every WNS registration
pub fn send_windows_toast(_timer: &TimerInfo) -> OutboundNotification {
    OutboundNotification::new(build_raw_payload(Platform::Wns, WINDOWS_TOAST))
}

/// Template notification built from a JSON string of template properties
pub fn send_template_from_string(_timer: &TimerInfo) -> Result<OutboundNotification> {
    let properties = parse_template_properties(HELLO_FROM_REDMOND)?;
    Ok(OutboundNotification::new(properties))
}

/// Template notification routed to the tag carried by a queue message
pub fn send_to_user_tag(
    record: &RoutingRecord,
    pattern: &TagPattern,
) -> Result<OutboundNotification> {
    let tag_expression = pattern.resolve(record)?;
    let properties = parse_template_properties(HELLO_FROM_REDMOND)?;

    Ok(OutboundNotification::builder(properties)
        .tag_expression(tag_expression)
        .build())
}

/// Windows toast produced as a string for a WNS-bound output
pub fn send_windows_toast_from_string(_timer: &TimerInfo) -> Result<OutboundNotification> {
    let payload = payload_from_output_string(Platform::Wns, WINDOWS_TOAST)?;
    Ok(OutboundNotification::builder(payload)
        .platform(Platform::Wns)
        .build())
}

/// Several template notifications returned in send order
pub fn send_notification_batch(_timer: &TimerInfo) -> Vec<OutboundNotification> {
    ["Message1", "Message2"]
        .into_iter()
        .map(|message| OutboundNotification::new(template_notification(message)))
        .collect()
}

/// Template notifications pushed onto a caller-owned batch; the caller flushes
pub fn send_with_batch(_timer: &TimerInfo, batch: &mut NotificationBatch) {
    batch.push_payload(template_notification("Hello"));
    batch.push_payload(template_notification("World"));
}

/// Bare template properties, wrapped as a template notification by the host
pub fn send_template_properties(_timer: &TimerInfo) -> TemplateProperties {
    build_template("Hello")
}

/// Timer job body: receives the tick and pushes its output onto the batch
pub type TimerJobFn = fn(&TimerInfo, &mut NotificationBatch) -> Result<()>;

/// A named timer job and the period it runs on
#[derive(Clone, Copy)]
pub struct TimerJob {
    pub name: &'static str,
    pub period: Duration,
    run: TimerJobFn,
}

impl TimerJob {
    pub fn new(name: &'static str, period: Duration, run: TimerJobFn) -> Self {
        Self { name, period, run }
    }

    /// Run the job into a fresh batch. Nothing is sent until the batch is flushed.
    pub fn run(&self, timer: &TimerInfo) -> Result<NotificationBatch> {
        let mut batch = NotificationBatch::new();
        (self.run)(timer, &mut batch)?;
        Ok(batch)
    }
}

impl fmt::Debug for TimerJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerJob")
            .field("name", &self.name)
            .field("period", &self.period)
            .finish()
    }
}

/// Every timer job, in declaration order
pub fn timer_jobs() -> Vec<TimerJob> {
    vec![
        TimerJob::new("send_template_notification", Duration::from_secs(15), |t, batch| {
            batch.push(send_template_notification(t));
            Ok(())
        }),
        TimerJob::new("send_windows_toast", Duration::from_secs(30), |t, batch| {
            batch.push(send_windows_toast(t));
            Ok(())
        }),
        TimerJob::new("send_template_from_string", Duration::from_secs(15), |t, batch| {
            batch.push(send_template_from_string(t)?);
            Ok(())
        }),
        TimerJob::new("send_windows_toast_from_string", Duration::from_secs(45), |t, batch| {
            batch.push(send_windows_toast_from_string(t)?);
            Ok(())
        }),
        TimerJob::new("send_notification_batch", Duration::from_secs(30), |t, batch| {
            batch.extend(send_notification_batch(t));
            Ok(())
        }),
        TimerJob::new("send_with_batch", Duration::from_secs(15), |t, batch| {
            send_with_batch(t, batch);
            Ok(())
        }),
        TimerJob::new("send_template_properties", Duration::from_secs(15), |t, batch| {
            batch.push_payload(send_template_properties(t));
            Ok(())
        }),
    ]
}

/// Look up a timer job by name
pub fn find_timer_job(name: &str) -> Option<TimerJob> {
    timer_jobs().into_iter().find(|job| job.name == name)
}
