//! lens-engine: Extraction & Proxy Engine for PageLens
//!
//! The algorithmic core: HTML transforms for safely embedding fetched
//! pages, CSS selector synthesis, and the schema-driven extraction
//! orchestrator.

pub mod error;
pub mod extract;
pub mod selector;
pub mod transform;

pub use error::{EngineError, Result};
pub use extract::{extract, validate_selectors};
pub use selector::{compute_selector, describe_element};
pub use transform::{
    inject_script_reference, proxy_pipeline, rewrite_relative_urls, strip_embedding_headers,
};
