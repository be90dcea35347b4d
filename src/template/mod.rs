//! Template notification composition.
//!
//! This module provides:
//! - Builders for template properties (`{"message": ...}` and arbitrary pairs)
//! - Raw platform payload wrapping
//! - Parsing of string handler output into payloads
//!
//! # Example
//!
//! ```ignore
//! let payload = template_notification("Hello");
//! let toast = build_raw_payload(Platform::Wns, "<toast>...</toast>");
//! let parsed = payload_from_output_string(
//!     Platform::Generic,
//!     r#"{"message":"Hello","location":"Redmond"}"#,
//! )?;
//! ```

mod builder;
mod parse;

pub use builder::{
    build_raw_payload, build_template, build_template_from_pairs, build_template_with_location,
    template_notification, LOCATION_KEY, MESSAGE_KEY,
};
pub use parse::{parse_template_properties, payload_from_output_string};
