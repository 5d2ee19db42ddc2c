//! Headless Chrome driver
//!
//! Owns the shared browser process behind the [`BrowserDriver`] trait.
//! The process is launched lazily on the first context request and
//! reused until shutdown; every request gets its own incognito
//! context whose tab is closed before the request completes.
//!
//! headless_chrome is a blocking CDP client, so every call is funneled
//! through `spawn_blocking` to keep navigation waits off the async
//! runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use lens_core::BrowserConfig;

use crate::driver::{BrowserDriver, PageHandle};
use crate::error::{BrowserError, Result};

/// Sentinel returned by in-page probes when `querySelector` throws,
/// so a malformed selector is distinguishable from a missing element.
const SELECTOR_ERROR: &str = "__lens_selector_error__";

fn join_error(e: JoinError) -> BrowserError {
    BrowserError::Context(format!("browser task failed: {e}"))
}

/// Process-wide headless Chrome session manager.
///
/// State machine: Uninitialized -> Running on first `open_context`,
/// back to Uninitialized only via `shutdown` (idempotent).
pub struct ChromeDriver {
    config: BrowserConfig,
    browser: Mutex<Option<Browser>>,
    open: Arc<AtomicUsize>,
}

impl ChromeDriver {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            browser: Mutex::new(None),
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return the running browser, launching it on first use.
    async fn ensure_running(&self) -> Result<Browser> {
        let mut guard = self.browser.lock().await;
        if let Some(browser) = guard.as_ref() {
            return Ok(browser.clone());
        }

        let config = self.config.clone();
        let browser = tokio::task::spawn_blocking(move || launch(&config))
            .await
            .map_err(join_error)??;

        info!(headless = self.config.headless, "Browser process launched");
        *guard = Some(browser.clone());
        Ok(browser)
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn open_context(&self) -> Result<Box<dyn PageHandle>> {
        let browser = self.ensure_running().await?;
        let timeout = Duration::from_secs(self.config.navigation_timeout);
        let user_agent = self.config.user_agent.clone();

        let tab = tokio::task::spawn_blocking(move || -> Result<Arc<Tab>> {
            let context = browser
                .new_context()
                .map_err(|e| BrowserError::Context(format!("failed to create context: {e}")))?;
            let tab = context
                .new_tab()
                .map_err(|e| BrowserError::Context(format!("failed to open tab: {e}")))?;
            tab.set_default_timeout(timeout);
            if let Some(ua) = user_agent {
                tab.set_user_agent(&ua, None, None)
                    .map_err(|e| BrowserError::Context(format!("failed to set user agent: {e}")))?;
            }
            Ok(tab)
        })
        .await
        .map_err(join_error)??;

        self.open.fetch_add(1, Ordering::SeqCst);
        debug!(open = self.open.load(Ordering::SeqCst), "Context opened");

        Ok(Box::new(ChromePage {
            tab,
            open: Arc::clone(&self.open),
            closed: AtomicBool::new(false),
        }))
    }

    fn open_contexts(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    async fn shutdown(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;
        if guard.take().is_some() {
            // Dropping the last handle kills the child process.
            info!("Browser process shut down");
        }
        Ok(())
    }
}

/// One incognito-context tab, exclusively owned by a request.
struct ChromePage {
    tab: Arc<Tab>,
    open: Arc<AtomicUsize>,
    closed: AtomicBool,
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            tab.navigate_to(&url)
                .map_err(|e| BrowserError::Navigation(format!("{url}: {e}")))?;
            tab.wait_until_navigated()
                .map_err(|e| BrowserError::Timeout(format!("{url}: {e}")))?;
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn content(&self) -> Result<String> {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || {
            tab.get_content()
                .map_err(|e| BrowserError::Extraction(format!("failed to get page source: {e}")))
        })
        .await
        .map_err(join_error)?
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>> {
        let tab = Arc::clone(&self.tab);
        let expr = probe_expression(
            selector,
            "el.textContent === null ? null : el.textContent.trim()",
        );
        tokio::task::spawn_blocking(move || {
            let result = tab
                .evaluate(&expr, false)
                .map_err(|e| BrowserError::Evaluation(format!("{e}")))?;
            match result.value {
                Some(Value::String(s)) if s == SELECTOR_ERROR => Err(BrowserError::Evaluation(
                    "malformed selector".to_string(),
                )),
                Some(Value::String(s)) => Ok(Some(s)),
                _ => Ok(None),
            }
        })
        .await
        .map_err(join_error)?
    }

    async fn query_exists(&self, selector: &str) -> Result<bool> {
        let tab = Arc::clone(&self.tab);
        let expr = probe_expression(selector, "true");
        tokio::task::spawn_blocking(move || {
            let result = tab
                .evaluate(&expr, false)
                .map_err(|e| BrowserError::Evaluation(format!("{e}")))?;
            match result.value {
                Some(Value::String(s)) if s == SELECTOR_ERROR => Err(BrowserError::Evaluation(
                    "malformed selector".to_string(),
                )),
                Some(Value::Bool(b)) => Ok(b),
                _ => Ok(false),
            }
        })
        .await
        .map_err(join_error)?
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.open.fetch_sub(1, Ordering::SeqCst);

        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || {
            tab.close(true)
                .map(|_| ())
                .map_err(|e| BrowserError::Context(format!("failed to close tab: {e}")))
        })
        .await
        .map_err(join_error)?
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        // Safety net for callers that bail without closing.
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.open.fetch_sub(1, Ordering::SeqCst);
            warn!("Context dropped without close, closing tab");
            let _ = self.tab.close(true);
        }
    }
}

/// Build a never-throwing in-page probe over `document.querySelector`.
///
/// `body` is evaluated with `el` bound to the first match; the whole
/// expression yields `null` when nothing matches and the error
/// sentinel when the selector itself is invalid.
fn probe_expression(selector: &str, body: &str) -> String {
    // serde_json produces a valid JS string literal for the selector.
    let literal = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(function() {{ try {{ const el = document.querySelector({literal}); \
         if (!el) return null; return {body}; }} catch (e) {{ return {sentinel:?}; }} }})()",
        sentinel = SELECTOR_ERROR,
    )
}

fn launch(config: &BrowserConfig) -> Result<Browser> {
    use std::ffi::OsStr;

    let args: Vec<String> = vec![
        format!("--window-size={},{}", config.width, config.height),
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
    ];
    let os_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

    let launch_options = LaunchOptionsBuilder::default()
        .headless(config.headless)
        .args(os_args)
        .build()
        .map_err(|e| BrowserError::Initialization(format!("failed to build launch options: {e}")))?;

    Browser::new(launch_options)
        .map_err(|e| BrowserError::Initialization(format!("failed to launch browser: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_expression_escapes_selector() {
        let expr = probe_expression("a[href=\"x\"]", "true");
        assert!(expr.contains("a[href=\\\"x\\\"]"));
        assert!(expr.contains(SELECTOR_ERROR));
    }

    #[tokio::test]
    async fn test_shutdown_before_launch_is_noop() {
        let driver = ChromeDriver::new(BrowserConfig::default());
        assert_eq!(driver.open_contexts(), 0);
        driver.shutdown().await.unwrap();
        driver.shutdown().await.unwrap();
    }
}
