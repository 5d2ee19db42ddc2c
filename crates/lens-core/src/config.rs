//! Configuration management
//!
//! Configuration is loaded from environment variables with sensible
//! defaults for every knob. The binary loads a `.env` file first, so
//! local overrides work without exporting anything.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port for the HTTP server
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Path under which the selector client script is served and
    /// injected into proxied pages
    #[serde(default = "default_script_path")]
    pub script_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
            script_path: default_script_path(),
        }
    }
}

/// Browser process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Whether to run in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Window width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Window height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Navigation timeout in seconds; exceeding it is a hard failure
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,

    /// Custom user agent for browsing contexts
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            width: default_width(),
            height: default_height(),
            navigation_timeout: default_navigation_timeout(),
            user_agent: None,
        }
    }
}

/// Main configuration for pagelens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PAGELENS_PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("invalid PAGELENS_PORT: {v}")))?,
            Err(_) => default_api_port(),
        };

        let navigation_timeout = match std::env::var("PAGELENS_NAV_TIMEOUT") {
            Ok(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("invalid PAGELENS_NAV_TIMEOUT: {v}")))?,
            Err(_) => default_navigation_timeout(),
        };

        Ok(Config {
            api: ApiConfig {
                port,
                script_path: std::env::var("PAGELENS_SCRIPT_PATH")
                    .unwrap_or_else(|_| default_script_path()),
            },
            browser: BrowserConfig {
                headless: std::env::var("PAGELENS_HEADLESS")
                    .map(|v| v.to_lowercase() != "false")
                    .unwrap_or(default_headless()),
                width: default_width(),
                height: default_height(),
                navigation_timeout,
                user_agent: std::env::var("PAGELENS_USER_AGENT").ok(),
            },
        })
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_script_path() -> String {
    "/selector.js".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_navigation_timeout() -> u64 {
    30
}
