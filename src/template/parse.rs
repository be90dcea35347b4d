//! Parsing of string handler output into payloads

use crate::error::{NotifyError, Result};
use crate::notification::{NotificationPayload, Platform, TemplateProperties};

use super::builder::build_raw_payload;

/// Parse a JSON object such as `{"message":"Hello","location":"Redmond"}`
/// into template properties.
///
/// Strings are taken as-is; numbers and booleans use their JSON text; null
/// becomes an empty string. Arrays and nested objects are rejected.
pub fn parse_template_properties(json: &str) -> Result<TemplateProperties> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| NotifyError::InvalidTemplateProperties(e.to_string()))?;

    let object = match value {
        serde_json::Value::Object(map) => map,
        _ => {
            return Err(NotifyError::InvalidTemplateProperties(
                "Template properties must be a JSON object".to_string(),
            ))
        }
    };

    let mut properties = TemplateProperties::new();
    for (key, value) in object {
        let rendered = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => String::new(),
            _ => {
                return Err(NotifyError::InvalidTemplateProperties(format!(
                    "Unsupported value type for key '{}'",
                    key
                )))
            }
        };
        properties = properties.with(key, rendered);
    }

    Ok(properties)
}

/// Turn a handler's string output into a payload.
///
/// For `Platform::Generic` the string holds template properties as JSON.
/// For any other platform it is native markup and passes through verbatim.
pub fn payload_from_output_string(platform: Platform, output: &str) -> Result<NotificationPayload> {
    match platform {
        Platform::Generic => parse_template_properties(output).map(NotificationPayload::Template),
        _ => Ok(build_raw_payload(platform, output)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_and_location() {
        let properties =
            parse_template_properties(r#"{"message":"Hello","location":"Redmond"}"#).unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("message"), Some("Hello"));
        assert_eq!(properties.get("location"), Some("Redmond"));
    }

    #[test]
    fn test_parse_scalar_values() {
        let properties =
            parse_template_properties(r#"{"count": 42, "urgent": true, "note": null}"#).unwrap();
        assert_eq!(properties.get("count"), Some("42"));
        assert_eq!(properties.get("urgent"), Some("true"));
        assert_eq!(properties.get("note"), Some(""));
    }

    #[test]
    fn test_parse_rejects_nested_values() {
        let result = parse_template_properties(r#"{"items": ["a", "b"]}"#);
        assert!(matches!(
            result,
            Err(NotifyError::InvalidTemplateProperties(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse_template_properties(r#""Hello""#),
            Err(NotifyError::InvalidTemplateProperties(_))
        ));
        assert!(matches!(
            parse_template_properties("not json"),
            Err(NotifyError::InvalidTemplateProperties(_))
        ));
    }

    #[test]
    fn test_generic_output_string_is_template() {
        let payload =
            payload_from_output_string(Platform::Generic, r#"{"message":"Hello"}"#).unwrap();
        assert_eq!(payload.properties().unwrap().get("message"), Some("Hello"));
    }

    #[test]
    fn test_platform_output_string_is_raw() {
        let toast = "<toast><visual/></toast>";
        let payload = payload_from_output_string(Platform::Wns, toast).unwrap();
        assert_eq!(payload.platform(), Platform::Wns);
        assert_eq!(payload.markup(), Some(toast));
    }

    #[test]
    fn test_platform_output_string_is_not_parsed() {
        // JSON-looking markup for a native platform stays raw
        let payload = payload_from_output_string(Platform::Fcm, "{broken").unwrap();
        assert_eq!(payload.markup(), Some("{broken"));
    }
}
