use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, Result};

/// Inbound event identifying the user a notification is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRecord {
    /// Tag the user's devices registered with
    #[serde(rename = "userIdTag", alias = "UserIdTag")]
    pub tag_key: String,

    /// Display name, informational only
    #[serde(rename = "userName", alias = "UserName", default)]
    pub display_name: String,
}

impl RoutingRecord {
    pub fn new(tag_key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            tag_key: tag_key.into(),
            display_name: display_name.into(),
        }
    }
}

/// Tag expression handed to the sink unchanged
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagExpression(String);

impl TagExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for TagExpression {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TagExpression {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TagExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pattern with exactly one `{name}` placeholder, e.g. `{tag}` or `user:{userIdTag}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    prefix: String,
    placeholder: String,
    suffix: String,
}

impl TagPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let open = pattern.find('{').ok_or_else(|| {
            NotifyError::InvalidTagPattern(format!("'{}' has no placeholder", pattern))
        })?;
        let close = pattern[open..]
            .find('}')
            .map(|i| i + open)
            .ok_or_else(|| {
                NotifyError::InvalidTagPattern(format!("'{}' has an unclosed placeholder", pattern))
            })?;

        let placeholder = &pattern[open + 1..close];
        if placeholder.is_empty() || placeholder.contains('{') {
            return Err(NotifyError::InvalidTagPattern(format!(
                "'{}' has an invalid placeholder name",
                pattern
            )));
        }

        let prefix = &pattern[..open];
        let suffix = &pattern[close + 1..];
        if prefix.contains('}') || suffix.contains(['{', '}']) {
            return Err(NotifyError::InvalidTagPattern(format!(
                "'{}' must contain exactly one placeholder",
                pattern
            )));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            placeholder: placeholder.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Name between the braces
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn resolve(&self, record: &RoutingRecord) -> Result<TagExpression> {
        resolve_tag_expression(record, self)
    }
}

impl FromStr for TagPattern {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}{}", self.prefix, self.placeholder, self.suffix)
    }
}

/// Substitute the record's tag key into the pattern.
///
/// Only an empty tag key is rejected; tag syntax is checked by the sink.
pub fn resolve_tag_expression(record: &RoutingRecord, pattern: &TagPattern) -> Result<TagExpression> {
    if record.tag_key.is_empty() {
        return Err(NotifyError::InvalidRoutingRecord(
            "tag key must not be empty".to_string(),
        ));
    }

    Ok(TagExpression(format!(
        "{}{}{}",
        pattern.prefix, record.tag_key, pattern.suffix
    )))
}
