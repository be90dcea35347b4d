//! Template and raw payload construction

use crate::notification::{NotificationPayload, Platform, TemplateProperties};

/// Placeholder the hub templates use for the notification text
pub const MESSAGE_KEY: &str = "message";

/// Placeholder for the optional location line
pub const LOCATION_KEY: &str = "location";

/// Build `{"message": message}`. Accepts any string, including an empty one.
pub fn build_template(message: &str) -> TemplateProperties {
    TemplateProperties::new().with(MESSAGE_KEY, message)
}

/// Build `{"message": message, "location": location}`
pub fn build_template_with_location(message: &str, location: &str) -> TemplateProperties {
    build_template(message).with(LOCATION_KEY, location)
}

/// Build template properties from caller-supplied pairs.
///
/// Keys and values are kept verbatim. A repeated key keeps its last value.
pub fn build_template_from_pairs<I, K, V>(pairs: I) -> TemplateProperties
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().collect()
}

/// Wrap `{"message": message}` as a template notification payload
pub fn template_notification(message: &str) -> NotificationPayload {
    NotificationPayload::Template(build_template(message))
}

/// Wrap platform markup as a raw payload. The markup is not validated.
pub fn build_raw_payload(platform: Platform, markup: impl Into<String>) -> NotificationPayload {
    NotificationPayload::Raw {
        platform,
        markup: markup.into(),
    }
}
