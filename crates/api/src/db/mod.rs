//! Shared database schema, migrations, and query builders.
//!
//! Builders return `(sql, values)` pairs; executing them is left to the store.

pub mod annotate;
pub mod attachments;
pub mod companies;
pub mod manufacturer_parts;
pub mod migrations;
pub mod parameters;
pub mod parts;
pub mod price_breaks;
pub mod supplier_parts;
pub mod tables;

// Re-export tables for convenience
pub use tables::*;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub type Built = (String, sea_query::Values);

/// Decimals are stored as normalized TEXT so equal values compare equal.
pub fn decimal_value(d: Decimal) -> sea_query::Value {
    d.normalize().to_string().into()
}

pub fn opt_decimal_value(d: Option<Decimal>) -> sea_query::Value {
    d.map(|d| d.normalize().to_string()).into()
}

/// Timestamps are stored as RFC 3339 TEXT.
pub fn timestamp_value(t: Option<DateTime<Utc>>) -> sea_query::Value {
    t.map(|t| t.to_rfc3339()).into()
}

/// `LIKE` pattern matching `needle` anywhere.
pub(crate) fn contains_pattern(needle: &str) -> String {
    format!("%{}%", needle.trim())
}
