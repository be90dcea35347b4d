use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routing::TagExpression;

/// Push platform a payload or registration belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Template registrations, independent of the device platform
    #[default]
    Generic,
    /// Windows Push Notification Services
    Wns,
    /// Apple Push Notification service
    Apns,
    /// Firebase Cloud Messaging
    Fcm,
    /// Amazon Device Messaging
    Adm,
    /// Baidu Cloud Push
    Baidu,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Generic => "generic",
            Platform::Wns => "wns",
            Platform::Apns => "apns",
            Platform::Fcm => "fcm",
            Platform::Adm => "adm",
            Platform::Baidu => "baidu",
        }
    }

    /// Content type a raw payload for this platform is sent with
    pub fn content_type(&self) -> &'static str {
        match self {
            Platform::Wns => "application/xml",
            _ => "application/json",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "template" => Ok(Platform::Generic),
            "wns" | "windows" => Ok(Platform::Wns),
            "apns" | "apple" => Ok(Platform::Apns),
            "fcm" | "gcm" => Ok(Platform::Fcm),
            "adm" => Ok(Platform::Adm),
            "baidu" => Ok(Platform::Baidu),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

/// Placeholder name to substitution value mapping for a template notification.
///
/// Values are kept exactly as supplied. Escaping for the transport is the
/// sink's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateProperties(HashMap<String, String>);

impl TemplateProperties {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Set a property, replacing any previous value for the key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for TemplateProperties {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A finished notification body, ready for a sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Generic template notification, expanded by the hub per registration
    Template(TemplateProperties),
    /// Native payload for a single platform, passed through verbatim
    Raw { platform: Platform, markup: String },
}

impl NotificationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::Template(_) => "template",
            NotificationPayload::Raw { .. } => "raw",
        }
    }

    /// Platform the payload targets; templates are always `Generic`
    pub fn platform(&self) -> Platform {
        match self {
            NotificationPayload::Template(_) => Platform::Generic,
            NotificationPayload::Raw { platform, .. } => *platform,
        }
    }

    pub fn properties(&self) -> Option<&TemplateProperties> {
        match self {
            NotificationPayload::Template(properties) => Some(properties),
            NotificationPayload::Raw { .. } => None,
        }
    }

    pub fn markup(&self) -> Option<&str> {
        match self {
            NotificationPayload::Template(_) => None,
            NotificationPayload::Raw { markup, .. } => Some(markup),
        }
    }
}

impl From<TemplateProperties> for NotificationPayload {
    fn from(properties: TemplateProperties) -> Self {
        NotificationPayload::Template(properties)
    }
}

/// A payload together with its routing, as handed to a sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundNotification {
    /// Unique identifier, used to correlate log lines
    pub id: Uuid,
    /// When the handler produced the notification
    pub created_at: DateTime<Utc>,
    pub payload: NotificationPayload,
    /// Tag expression restricting the recipients (broadcast when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_expression: Option<TagExpression>,
    /// Restrict a template notification to registrations of one platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

/// Builder for outbound notifications
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    payload: NotificationPayload,
    tag_expression: Option<TagExpression>,
    platform: Option<Platform>,
}

impl NotificationBuilder {
    pub fn new(payload: impl Into<NotificationPayload>) -> Self {
        Self {
            payload: payload.into(),
            tag_expression: None,
            platform: None,
        }
    }

    /// Route to recipients matching the tag expression
    pub fn tag_expression(mut self, expression: TagExpression) -> Self {
        self.tag_expression = Some(expression);
        self
    }

    /// Route to recipients matching the tag expression, if any
    pub fn maybe_tag_expression(mut self, expression: Option<TagExpression>) -> Self {
        self.tag_expression = expression;
        self
    }

    /// Select the platform registrations to deliver to
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn build(self) -> OutboundNotification {
        OutboundNotification {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            payload: self.payload,
            tag_expression: self.tag_expression,
            platform: self.platform,
        }
    }
}

impl OutboundNotification {
    /// Broadcast notification with no tag or platform restriction
    pub fn new(payload: impl Into<NotificationPayload>) -> Self {
        NotificationBuilder::new(payload).build()
    }

    pub fn builder(payload: impl Into<NotificationPayload>) -> NotificationBuilder {
        NotificationBuilder::new(payload)
    }

    pub fn is_broadcast(&self) -> bool {
        self.tag_expression.is_none()
    }

    /// Platform the sink should deliver to: the explicit selector, else the payload's
    pub fn target_platform(&self) -> Platform {
        self.platform.unwrap_or_else(|| self.payload.platform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_platform_parsing() {
        assert_eq!("WNS".parse::<Platform>().unwrap(), Platform::Wns);
        assert_eq!("gcm".parse::<Platform>().unwrap(), Platform::Fcm);
        assert_eq!("Apns".parse::<Platform>().unwrap(), Platform::Apns);
        assert!("mpns".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_content_type() {
        assert_eq!(Platform::Wns.content_type(), "application/xml");
        assert_eq!(Platform::Apns.content_type(), "application/json");
        assert_eq!(Platform::Fcm.content_type(), "application/json");
    }

    #[test]
    fn test_template_properties_serialize_flat() {
        let properties = TemplateProperties::new()
            .with("message", "Hello")
            .with("location", "Redmond");

        let value = serde_json::to_value(&properties).unwrap();
        assert_eq!(value, json!({"message": "Hello", "location": "Redmond"}));
    }

    #[test]
    fn test_payload_accessors() {
        let template = NotificationPayload::from(TemplateProperties::new().with("message", "Hi"));
        assert_eq!(template.kind(), "template");
        assert_eq!(template.platform(), Platform::Generic);
        assert_eq!(template.properties().unwrap().get("message"), Some("Hi"));
        assert!(template.markup().is_none());

        let raw = NotificationPayload::Raw {
            platform: Platform::Apns,
            markup: r#"{"aps":{"alert":"Hi"}}"#.to_string(),
        };
        assert_eq!(raw.kind(), "raw");
        assert_eq!(raw.platform(), Platform::Apns);
        assert!(raw.properties().is_none());
    }

    #[test]
    fn test_payload_serialization_shape() {
        let raw = NotificationPayload::Raw {
            platform: Platform::Wns,
            markup: "<toast/>".to_string(),
        };
        let value = serde_json::to_value(&raw).unwrap();
        assert_eq!(
            value,
            json!({"kind": "raw", "body": {"platform": "wns", "markup": "<toast/>"}})
        );
    }

    #[test]
    fn test_notification_builder() {
        let notification =
            OutboundNotification::builder(TemplateProperties::new().with("message", "Hi"))
                .tag_expression(TagExpression::from("alice123"))
                .platform(Platform::Apns)
                .build();

        assert!(!notification.is_broadcast());
        assert_eq!(notification.tag_expression.as_ref().unwrap().as_str(), "alice123");
        assert_eq!(notification.target_platform(), Platform::Apns);
    }

    #[test]
    fn test_broadcast_notification() {
        let notification = OutboundNotification::new(TemplateProperties::new());
        assert!(notification.is_broadcast());
        assert_eq!(notification.target_platform(), Platform::Generic);
    }
}
