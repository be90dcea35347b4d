//! Notification payload types.
//!
//! A handler produces an [`OutboundNotification`]: a [`NotificationPayload`]
//! (a generic template or a raw platform payload) plus optional tag and
//! platform routing. Sinks consume it unchanged.

mod types;

pub use types::{
    NotificationBuilder, NotificationPayload, OutboundNotification, Platform, TemplateProperties,
};
