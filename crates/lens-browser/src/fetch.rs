//! Page fetcher
//!
//! Fetches the fully rendered HTML of a page through a short-lived
//! browsing context. The context is closed on every exit path; any
//! failure surfaces as a single fetch error carrying the cause.

use tracing::{debug, warn};

use crate::driver::BrowserDriver;
use crate::error::{BrowserError, Result};

/// Navigate a fresh context to `url` and return the rendered HTML.
pub async fn fetch_page(driver: &dyn BrowserDriver, url: &str) -> Result<String> {
    let page = driver.open_context().await?;

    let outcome = async {
        page.navigate(url).await?;
        page.content().await
    }
    .await;

    if let Err(e) = page.close().await {
        warn!(url, error = %e, "Failed to close context after fetch");
    }

    match outcome {
        Ok(html) => {
            debug!(url, bytes = html.len(), "Fetched page");
            Ok(html)
        }
        Err(e) => Err(BrowserError::FetchFailed(format!("{url}: {e}"))),
    }
}
