//! Type coercion engine
//!
//! Maps raw extracted text plus a declared data type to a typed JSON
//! value. `null` is the designated "unparseable" sentinel for every
//! type except `boolean`, which never produces null: text that matches
//! no truthy keyword coerces to `false`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::schema::DataType;

/// Substrings that make a boolean field read as true (case-insensitive).
/// Anything else is false; there is no negative-keyword set.
const TRUTHY: &[&str] = &["true", "yes", "1", "in stock", "available", "active"];

/// Date-only formats tried after the timestamped ones
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"];

/// Coerce raw trimmed text into a typed value per the declared type.
///
/// Returns `Value::Null` when the text cannot be parsed as the
/// declared type (except for booleans, see [`parse_boolean`]).
pub fn coerce(raw: &str, data_type: DataType) -> Value {
    match data_type {
        DataType::String => Value::String(raw.to_string()),
        DataType::Number | DataType::Currency => parse_number(raw),
        DataType::Boolean => Value::Bool(parse_boolean(raw)),
        DataType::Date => parse_date(raw),
    }
}

/// Numeric rule shared by `number` and `currency`: strip everything
/// except digits, `.` and `-`, then parse as f64. The currency hint on
/// the field is display metadata only and plays no part here.
fn parse_number(raw: &str) -> Value {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn parse_boolean(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    let lower = lower.trim();
    TRUTHY.iter().any(|t| lower.contains(t))
}

/// Generic date parsing, normalized to a fixed ISO-8601 UTC timestamp.
fn parse_date(raw: &str) -> Value {
    let parsed: Option<DateTime<Utc>> = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| DateTime::parse_from_rfc2822(raw).map(|dt| dt.with_timezone(&Utc)))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            DATE_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(raw, fmt)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
        });

    match parsed {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => Value::Null,
    }
}
