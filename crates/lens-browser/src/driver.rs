//! Browser driver traits
//!
//! The extraction engine talks to the browser through these traits
//! rather than a specific automation backend, so tests run against a
//! scripted mock and production runs against headless Chrome.

use async_trait::async_trait;

use crate::error::Result;

/// One isolated browsing context, exclusively owned by a single
/// in-flight request.
///
/// Implementations must make [`close`](PageHandle::close) idempotent;
/// callers invoke it on every exit path, including failures.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate to `url` and wait for the page to settle, bounded by
    /// the driver's navigation timeout.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Fully rendered document HTML.
    async fn content(&self) -> Result<String>;

    /// Trimmed text content of the first match of `selector`, or
    /// `None` when nothing matches. A malformed selector is an error.
    async fn query_text(&self, selector: &str) -> Result<Option<String>>;

    /// Whether `selector` matches at least one element.
    async fn query_exists(&self, selector: &str) -> Result<bool>;

    /// Close the context. Never leaks across requests.
    async fn close(&self) -> Result<()>;
}

/// Process-wide browser session manager.
///
/// The only shared mutable resource in the engine: a lazily-launched
/// browser process handing out isolated contexts. Safe for concurrent
/// use because contexts are single-owner.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Open a fresh isolated context (separate cookie/storage jar),
    /// launching the browser process on first use.
    async fn open_context(&self) -> Result<Box<dyn PageHandle>>;

    /// Number of contexts currently open. Zero when no request is in
    /// flight; used to detect context leaks.
    fn open_contexts(&self) -> usize;

    /// Tear down the browser process. Idempotent; a no-op when the
    /// browser was never launched.
    async fn shutdown(&self) -> Result<()>;
}
