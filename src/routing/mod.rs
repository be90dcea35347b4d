//! Tag-based routing.
//!
//! A queue message carries a [`RoutingRecord`]; its tag key is substituted
//! into a [`TagPattern`] to give the [`TagExpression`] the hub routes on.

mod tag;

pub use tag::{resolve_tag_expression, RoutingRecord, TagExpression, TagPattern};
