//! Input validation
//!
//! All validation runs before any network or browser work. A rejected
//! input is never retried.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::schema::Schema;

static FIELD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid field name regex"));

/// Validate that a target URL is well-formed and uses http or https.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        Url::parse(url).map_err(|_| Error::Validation("Invalid URL format".to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(Error::Validation(
            "URL must use HTTP or HTTPS protocol".to_string(),
        )),
    }
}

/// Validate the opaque schema identifier format (`schema_` prefix).
pub fn validate_schema_id(schema_id: &str) -> Result<()> {
    if schema_id.is_empty() {
        return Err(Error::Validation("Schema ID is required".to_string()));
    }
    if !schema_id.starts_with("schema_") {
        return Err(Error::Validation("Invalid schema ID format".to_string()));
    }
    Ok(())
}

/// Validate a field name (snake_case token).
pub fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("Field name is required".to_string()));
    }
    if !FIELD_NAME_RE.is_match(name) {
        return Err(Error::Validation(
            "Field name must be in snake_case format".to_string(),
        ));
    }
    Ok(())
}

/// Validate a CSS selector (non-empty after trimming).
pub fn validate_css_selector(selector: &str) -> Result<()> {
    if selector.trim().is_empty() {
        return Err(Error::Validation("CSS selector is required".to_string()));
    }
    Ok(())
}

/// Validate a whole schema before it drives an extraction: at least
/// one field, every field name and selector well-formed.
pub fn validate_schema(schema: &Schema) -> Result<()> {
    if schema.fields.is_empty() {
        return Err(Error::Validation(
            "Schema must have at least one field".to_string(),
        ));
    }
    for field in &schema.fields {
        validate_field_name(&field.name)?;
        validate_css_selector(&field.css_selector)?;
    }
    Ok(())
}
