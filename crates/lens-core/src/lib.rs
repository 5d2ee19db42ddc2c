//! lens-core: PageLens Core Library
//!
//! Domain types, validation, and the type coercion engine shared by
//! the extraction and proxy components.

pub mod coerce;
pub mod config;
pub mod error;
pub mod protocol;
pub mod schema;
pub mod validate;

pub use coerce::coerce;
pub use config::{ApiConfig, BrowserConfig, Config};
pub use error::{Error, Result};
pub use protocol::{InboundMessage, OutboundMessage, SelectedElement};
pub use schema::{DataType, FetchResult, Field, Schema};
pub use validate::{
    validate_css_selector, validate_field_name, validate_schema, validate_schema_id, validate_url,
};
