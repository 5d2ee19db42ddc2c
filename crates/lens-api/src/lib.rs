//! lens-api: HTTP API for PageLens
//!
//! REST endpoints for the proxy and live-extraction paths, plus the
//! schema store read contract. Built with axum for async HTTP
//! handling.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod store;

pub use error::{ApiError, Result};
pub use server::{AppState, start_server};
pub use store::{MemorySchemaStore, SchemaStore};
