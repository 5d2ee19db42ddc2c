//! Error types for lens-browser

use thiserror::Error;

/// lens-browser error type
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    Initialization(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Navigation timeout: {0}")]
    Timeout(String),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Context error: {0}")]
    Context(String),

    #[error("Failed to fetch page: {0}")]
    FetchFailed(String),
}

impl BrowserError {
    /// Stable error code exposed to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            BrowserError::Initialization(_) | BrowserError::Context(_) => "BROWSER_ERROR",
            BrowserError::Navigation(_)
            | BrowserError::Timeout(_)
            | BrowserError::FetchFailed(_) => "FETCH_FAILED",
            BrowserError::Evaluation(_) | BrowserError::Extraction(_) => "EXTRACTION_FAILED",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BrowserError>;
