//! HTTP API handlers
//!
//! Request handlers for the proxy and live-extraction endpoints. All
//! input validation happens here, before any browser work; terminal
//! errors answer with a stable error code and a human-readable
//! message, never raw internal error text.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use lens_browser::fetch_page;
use lens_core::{FetchResult, validate_schema, validate_schema_id, validate_url};
use lens_engine::{extract, proxy_pipeline, validate_selectors};

use crate::server::AppState;

/// The selector client script, compiled into the binary.
const SELECTOR_SCRIPT: &str = include_str!("../assets/selector.js");

// ============================================================================
// Request/Response types
// ============================================================================

/// Query string carrying the target URL
#[derive(Debug, Deserialize)]
pub struct TargetUrlQuery {
    pub url: Option<String>,
}

/// Selector validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Generic API error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Stable machine-readable error code
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn error_reply(status: StatusCode, code: &str, message: &str) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: code.to_string(),
            message: message.to_string(),
            suggestion: None,
        }),
    )
}

fn validation_reply(e: &lens_core::Error) -> ErrorReply {
    error_reply(StatusCode::BAD_REQUEST, e.code(), &e.to_string())
}

fn not_found_reply(schema_id: &str) -> ErrorReply {
    let e = lens_core::Error::SchemaNotFound(schema_id.to_string());
    error_reply(StatusCode::NOT_FOUND, e.code(), "Schema does not exist")
}

/// Map an engine failure onto the envelope without leaking the
/// underlying exception text.
fn engine_reply(e: &lens_engine::EngineError) -> ErrorReply {
    let code = e.code();
    let (status, message) = match code {
        "FETCH_FAILED" => (
            StatusCode::BAD_GATEWAY,
            "Failed to fetch the target URL",
        ),
        "EXTRACTION_FAILED" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Extraction against the target page failed",
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Browser session error",
        ),
    };
    error_reply(status, code, message)
}

fn require_url(query: &TargetUrlQuery) -> Result<&str, ErrorReply> {
    let url = query.url.as_deref().ok_or_else(|| {
        error_reply(
            StatusCode::BAD_REQUEST,
            "INVALID_URL",
            "URL parameter is required",
        )
    })?;
    validate_url(url).map_err(|e| validation_reply(&e))?;
    Ok(url)
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Serve the selector client script injected into proxied pages
pub async fn selector_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SELECTOR_SCRIPT,
    )
}

/// Proxy endpoint: fetch a page, sanitize it for embedding, inject
/// the selector script, and return it as HTML.
pub async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<TargetUrlQuery>,
) -> Result<Response, ErrorReply> {
    let url = require_url(&query)?;
    debug!(url, "Proxy request");

    let html = fetch_page(state.driver.as_ref(), url).await.map_err(|e| {
        error!(url, error = %e, "Proxy fetch failed");
        engine_reply(&e.into())
    })?;

    let transformed = proxy_pipeline(&html, url, &state.config.api.script_path);
    info!(url, bytes = transformed.len(), "Proxied page");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        transformed,
    )
        .into_response())
}

/// Live extraction endpoint: re-fetch the target page and return
/// typed values per the stored schema.
pub async fn fetch_live(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
    Query(query): Query<TargetUrlQuery>,
) -> Result<Json<FetchResult>, ErrorReply> {
    let url = require_url(&query)?;
    validate_schema_id(&schema_id).map_err(|e| validation_reply(&e))?;

    let schema = state
        .store
        .find_by_id(&schema_id)
        .await
        .ok_or_else(|| not_found_reply(&schema_id))?;
    validate_schema(&schema).map_err(|e| validation_reply(&e))?;

    let result = extract(state.driver.as_ref(), &schema, url)
        .await
        .map_err(|e| {
            error!(schema_id, url, error = %e, "Extraction failed");
            engine_reply(&e)
        })?;

    info!(schema_id, url, fields = result.data.len(), "Extraction served");
    Ok(Json(result))
}

/// Selector validation endpoint: true only when every field selector
/// of the schema resolves on the live page.
pub async fn validate_schema_selectors(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
    Query(query): Query<TargetUrlQuery>,
) -> Result<Json<ValidateResponse>, ErrorReply> {
    let url = require_url(&query)?;
    validate_schema_id(&schema_id).map_err(|e| validation_reply(&e))?;

    let schema = state
        .store
        .find_by_id(&schema_id)
        .await
        .ok_or_else(|| not_found_reply(&schema_id))?;
    validate_schema(&schema).map_err(|e| validation_reply(&e))?;

    let valid = validate_selectors(state.driver.as_ref(), &schema, url)
        .await
        .map_err(|e| {
            error!(schema_id, url, error = %e, "Selector validation failed");
            engine_reply(&e)
        })?;

    Ok(Json(ValidateResponse { valid }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::routes;
    use crate::store::{MemorySchemaStore, SchemaStore};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use chrono::Utc;
    use lens_browser::mock::MockDriver;
    use lens_core::{Config, DataType, Field, Schema};
    use std::sync::Arc;
    use tower::ServiceExt;

    const PAGE_URL: &str = "https://shop.test/item";

    fn product_schema() -> Schema {
        Schema {
            schema_id: "schema_prod01".to_string(),
            name: "product".to_string(),
            source_url: PAGE_URL.to_string(),
            created_at: Utc::now(),
            fields: vec![
                Field {
                    name: "price".to_string(),
                    css_selector: ".price".to_string(),
                    data_type: DataType::Currency,
                    confidence: 0.95,
                    currency_hint: Some("USD".to_string()),
                },
                Field {
                    name: "missing".to_string(),
                    css_selector: "#nope".to_string(),
                    data_type: DataType::String,
                    confidence: 0.5,
                    currency_hint: None,
                },
            ],
            sample_output: Default::default(),
        }
    }

    async fn test_app() -> Router {
        let driver = MockDriver::new().with_page(
            PAGE_URL,
            "<html><body><a href=\"/next\">n</a><span class=\"price\">$19.99</span></body></html>",
        );
        let store = MemorySchemaStore::new();
        store.insert(product_schema()).await;

        let state = AppState {
            config: Config::default(),
            driver: Arc::new(driver),
            store: Arc::new(store),
        };
        routes().with_state(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_proxy_transforms_and_injects() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/proxy?url=https://shop.test/item")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("href=\"https://shop.test/next\""));
        assert!(html.contains("<script src=\"/selector.js\"></script>"));
    }

    #[tokio::test]
    async fn test_proxy_rejects_bad_urls() {
        let (status, body) = get(test_app().await, "/api/v1/proxy?url=ftp://x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["success"], false);

        let (status, body) = get(test_app().await, "/api/v1/proxy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_URL");
    }

    #[tokio::test]
    async fn test_proxy_unreachable_target_is_bad_gateway() {
        let (status, body) = get(
            test_app().await,
            "/api/v1/proxy?url=https://unknown.test/page",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "FETCH_FAILED");
        // The upstream cause stays in the logs, not the envelope.
        assert_eq!(body["message"], "Failed to fetch the target URL");
    }

    #[tokio::test]
    async fn test_fetch_live_returns_typed_result() {
        let (status, body) = get(
            test_app().await,
            "/api/v1/fetch/schema_prod01?url=https://shop.test/item",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schema_id"], "schema_prod01");
        assert_eq!(body["data"]["price"], 19.99);
        assert_eq!(body["data"]["missing"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_fetch_live_unknown_schema_is_404() {
        let (status, body) = get(
            test_app().await,
            "/api/v1/fetch/schema_ghost?url=https://shop.test/item",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "SCHEMA_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_fetch_live_malformed_schema_id_is_rejected() {
        let (status, body) = get(
            test_app().await,
            "/api/v1/fetch/bogus?url=https://shop.test/item",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_validate_endpoint_reports_unmatched_selectors() {
        // product_schema has a field bound to #nope, which the page lacks.
        let (status, body) = get(
            test_app().await,
            "/api/v1/validate/schema_prod01?url=https://shop.test/item",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_selector_script_is_served() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/selector.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/javascript; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let script = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(script.contains("ELEMENT_SELECTED"));
        assert!(script.contains("CLEAR_HIGHLIGHT"));
    }
}
