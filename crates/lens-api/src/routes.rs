//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{Router, routing::get};

use crate::handlers::{fetch_live, health, proxy, selector_script, validate_schema_selectors};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Selector client script (injected into proxied pages)
        .route("/selector.js", get(selector_script))
        // Proxy path
        .route("/api/v1/proxy", get(proxy))
        // Extraction path
        .route("/api/v1/fetch/{schema_id}", get(fetch_live))
        .route("/api/v1/validate/{schema_id}", get(validate_schema_selectors))
}
