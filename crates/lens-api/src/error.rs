//! Error types for lens-api

use thiserror::Error;

/// lens-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] lens_core::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] lens_engine::EngineError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
