//! Schema domain types
//!
//! A schema is a named, ordered set of field definitions bound to CSS
//! selectors. Schemas are owned by the external schema store; this
//! engine only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Declared data type of an extraction field
///
/// Unrecognized type names deserialize to `String`, so unknown types
/// follow the string coercion rule end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Currency,
    Date,
    Boolean,
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "number" => DataType::Number,
            "currency" => DataType::Currency,
            "date" => DataType::Date,
            "boolean" => DataType::Boolean,
            // Anything else, including "string", takes the string rule.
            _ => DataType::String,
        })
    }
}

/// One named extraction target within a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within the schema (snake_case token)
    pub name: String,

    /// CSS selector the field is bound to
    pub css_selector: String,

    /// Declared data type
    pub data_type: DataType,

    /// Confidence in the selector binding (0..1)
    #[serde(default)]
    pub confidence: f64,

    /// ISO-like currency code, present iff `data_type` is `Currency`.
    /// Carried for downstream display only; coercion ignores it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_hint: Option<String>,
}

/// A stored extraction schema (read-only to the engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Opaque identifier assigned by the schema store (`schema_` prefix)
    pub schema_id: String,

    /// Human-readable schema name
    pub name: String,

    /// URL the schema was originally built against
    pub source_url: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Ordered field list; invariant: never empty
    pub fields: Vec<Field>,

    /// Sample output captured when the schema was defined
    #[serde(default)]
    pub sample_output: Map<String, Value>,
}

/// Result of one live extraction call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// Identifier of the schema that drove the extraction
    pub schema_id: String,

    /// URL the page was fetched from
    pub url: String,

    /// Server-assigned extraction timestamp (RFC 3339)
    pub extracted_at: String,

    /// Field name to coerced value (or null), in schema field order
    pub data: Map<String, Value>,
}
