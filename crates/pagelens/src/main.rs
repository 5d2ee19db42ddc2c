//! pagelens: PageLens Main Binary
//!
//! Main entry point for the PageLens extraction & proxy engine.
//!
//! Usage:
//!   pagelens             - Start the HTTP server
//!   pagelens --help      - Show help
//!   pagelens --version   - Show version

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use lens_api::{MemorySchemaStore, SchemaStore, start_server};
use lens_browser::{BrowserDriver, ChromeDriver};
use lens_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("pagelens {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            _ => {}
        }
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting pagelens...");
    tracing::info!(
        port = config.api.port,
        headless = config.browser.headless,
        "Configuration loaded"
    );

    let chrome = Arc::new(ChromeDriver::new(config.browser.clone()));
    let driver: Arc<dyn BrowserDriver> = chrome.clone();
    let store: Arc<dyn SchemaStore> = Arc::new(MemorySchemaStore::new());

    tokio::select! {
        result = start_server(config, driver, store) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    chrome.shutdown().await?;
    tracing::info!("pagelens stopped");

    Ok(())
}

/// Print help message
fn print_help() {
    println!("pagelens - schema-driven web page extraction engine");
    println!();
    println!("Usage:");
    println!("  pagelens             Start the HTTP server");
    println!("  pagelens --help      Show this help message");
    println!("  pagelens --version   Show version");
    println!();
    println!("Environment Variables:");
    println!("  PAGELENS_PORT          HTTP port (default: 3000)");
    println!("  PAGELENS_NAV_TIMEOUT   Navigation timeout seconds (default: 30)");
    println!("  PAGELENS_HEADLESS      Run Chrome headless (default: true)");
    println!("  PAGELENS_USER_AGENT    Custom user agent for fetch contexts");
    println!("  PAGELENS_SCRIPT_PATH   Selector script path (default: /selector.js)");
    println!("  RUST_LOG               Log filter (default: info)");
}
