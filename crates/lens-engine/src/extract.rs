//! Extraction orchestrator
//!
//! Resolves a schema's field list against a live rendered page and
//! coerces each value. One context, one navigation per call; fields
//! are processed strictly in declaration order, and any per-field
//! failure degrades to `null` without aborting the extraction.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use lens_browser::{BrowserDriver, BrowserError};
use lens_core::{FetchResult, Schema, coerce};

use crate::error::Result;

/// Extract typed values for every field of `schema` from the live
/// page at `url`.
///
/// A missing or broken field records `null`; only navigation-level
/// failures surface as errors. The browsing context is closed on
/// every exit path.
pub async fn extract(driver: &dyn BrowserDriver, schema: &Schema, url: &str) -> Result<FetchResult> {
    let page = driver.open_context().await?;

    let outcome = async {
        page.navigate(url).await?;

        let mut data = Map::new();
        for field in &schema.fields {
            let value = match page.query_text(&field.css_selector).await {
                Ok(Some(raw)) => coerce(&raw, field.data_type),
                Ok(None) => {
                    warn!(
                        field = %field.name,
                        selector = %field.css_selector,
                        "Selector matched nothing"
                    );
                    Value::Null
                }
                Err(e) => {
                    warn!(field = %field.name, error = %e, "Field extraction failed");
                    Value::Null
                }
            };
            data.insert(field.name.clone(), value);
        }
        Ok::<_, BrowserError>(data)
    }
    .await;

    if let Err(e) = page.close().await {
        warn!(url, error = %e, "Failed to close context after extraction");
    }

    let data = outcome?;
    debug!(schema_id = %schema.schema_id, url, fields = data.len(), "Extraction complete");

    Ok(FetchResult {
        schema_id: schema.schema_id.clone(),
        url: url.to_string(),
        extracted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        data,
    })
}

/// Check that every field selector of `schema` resolves to at least
/// one element on the live page. Navigation failure counts as not
/// validating, mirroring extraction's per-request error boundary.
pub async fn validate_selectors(driver: &dyn BrowserDriver, schema: &Schema, url: &str) -> Result<bool> {
    let page = driver.open_context().await?;

    let outcome = async {
        if let Err(e) = page.navigate(url).await {
            warn!(url, error = %e, "Validation navigation failed");
            return false;
        }
        let mut all_valid = true;
        for field in &schema.fields {
            match page.query_exists(&field.css_selector).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(selector = %field.css_selector, "Invalid selector");
                    all_valid = false;
                }
                Err(e) => {
                    warn!(selector = %field.css_selector, error = %e, "Selector check failed");
                    all_valid = false;
                }
            }
        }
        all_valid
    }
    .await;

    if let Err(e) = page.close().await {
        warn!(url, error = %e, "Failed to close context after validation");
    }

    Ok(outcome)
}
