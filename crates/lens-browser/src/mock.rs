//! Scripted mock driver
//!
//! An in-memory [`BrowserDriver`] that serves canned HTML keyed by
//! URL and resolves selectors with `scraper`, so the orchestrator and
//! fetcher can be exercised without a Chrome process. URLs can also be
//! scripted to fail navigation, which stands in for timeouts and DNS
//! failures in leak tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::driver::{BrowserDriver, PageHandle};
use crate::error::{BrowserError, Result};

/// Builder-style mock browser driver.
#[derive(Default)]
pub struct MockDriver {
    pages: HashMap<String, String>,
    failing: HashMap<String, String>,
    open: Arc<AtomicUsize>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` when a context navigates to `url`.
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Fail navigation to `url` with a timeout carrying `reason`.
    pub fn with_failure(mut self, url: &str, reason: &str) -> Self {
        self.failing.insert(url.to_string(), reason.to_string());
        self
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn open_context(&self) -> Result<Box<dyn PageHandle>> {
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPage {
            pages: self.pages.clone(),
            failing: self.failing.clone(),
            current: std::sync::Mutex::new(None),
            open: Arc::clone(&self.open),
            closed: AtomicBool::new(false),
        }))
    }

    fn open_contexts(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

struct MockPage {
    pages: HashMap<String, String>,
    failing: HashMap<String, String>,
    current: std::sync::Mutex<Option<String>>,
    open: Arc<AtomicUsize>,
    closed: AtomicBool,
}

impl MockPage {
    fn current_html(&self) -> Result<String> {
        self.current
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| BrowserError::Navigation("no page loaded".to_string()))
    }
}

#[async_trait]
impl PageHandle for MockPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        if let Some(reason) = self.failing.get(url) {
            return Err(BrowserError::Timeout(format!("{url}: {reason}")));
        }
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| BrowserError::Navigation(format!("{url}: connection refused")))?;
        if let Ok(mut guard) = self.current.lock() {
            *guard = Some(html.clone());
        }
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.current_html()
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>> {
        let html = self.current_html()?;
        let parsed = Selector::parse(selector)
            .map_err(|e| BrowserError::Evaluation(format!("malformed selector: {e}")))?;
        let document = Html::parse_document(&html);
        Ok(document
            .select(&parsed)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string()))
    }

    async fn query_exists(&self, selector: &str) -> Result<bool> {
        let html = self.current_html()?;
        let parsed = Selector::parse(selector)
            .map_err(|e| BrowserError::Evaluation(format!("malformed selector: {e}")))?;
        let document = Html::parse_document(&html);
        Ok(document.select(&parsed).next().is_some())
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_navigation_and_query() {
        let driver = MockDriver::new()
            .with_page("https://shop.test/item", "<p class=\"price\">$5</p>");

        let page = driver.open_context().await.unwrap();
        assert_eq!(driver.open_contexts(), 1);

        page.navigate("https://shop.test/item").await.unwrap();
        assert_eq!(
            page.query_text(".price").await.unwrap(),
            Some("$5".to_string())
        );
        assert_eq!(page.query_text(".missing").await.unwrap(), None);
        assert!(page.query_text("p..q").await.is_err());

        page.close().await.unwrap();
        page.close().await.unwrap();
        assert_eq!(driver.open_contexts(), 0);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let driver = MockDriver::new().with_failure("https://slow.test", "timed out");
        let page = driver.open_context().await.unwrap();
        assert!(matches!(
            page.navigate("https://slow.test").await,
            Err(BrowserError::Timeout(_))
        ));
        page.close().await.unwrap();
    }
}
