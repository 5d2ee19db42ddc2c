//! Error types for lens-engine

use thiserror::Error;

use lens_browser::BrowserError;

/// lens-engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

impl EngineError {
    /// Stable error code exposed to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Browser(e) => e.code(),
            EngineError::InvalidSelector(_) => "VALIDATION_ERROR",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
