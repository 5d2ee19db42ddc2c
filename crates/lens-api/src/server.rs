//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use lens_browser::BrowserDriver;
use lens_core::Config;

use crate::error::Result;
use crate::routes::routes;
use crate::store::SchemaStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub driver: Arc<dyn BrowserDriver>,
    pub store: Arc<dyn SchemaStore>,
}

/// Start the HTTP API server
pub async fn start_server(
    config: Config,
    driver: Arc<dyn BrowserDriver>,
    store: Arc<dyn SchemaStore>,
) -> Result<()> {
    let port = config.api.port;
    let state = AppState {
        config,
        driver,
        store,
    };

    let app = Router::new()
        .merge(routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
