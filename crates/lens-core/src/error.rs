//! Error types for lens-core

use thiserror::Error;

/// Main error type for lens-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Stable error code exposed to API callers.
    ///
    /// Terminal errors never leak internal exception text; the code is
    /// the machine-readable half of the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::SchemaNotFound(_) => "SCHEMA_NOT_FOUND",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Result type alias for lens-core
pub type Result<T> = std::result::Result<T, Error>;
