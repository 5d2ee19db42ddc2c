//! lens-browser: Browser session management for PageLens
//!
//! Owns the shared headless Chrome process and hands out isolated,
//! single-use browsing contexts behind the [`BrowserDriver`] trait.
//!
//! ## Features
//!
//! - Lazy browser launch, reused across requests
//! - Per-request incognito contexts with guaranteed teardown
//! - Rendered-page fetching with a bounded navigation wait
//! - A scripted [`mock::MockDriver`] for tests

pub mod chrome;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod mock;

pub use chrome::ChromeDriver;
pub use driver::{BrowserDriver, PageHandle};
pub use error::{BrowserError, Result};
pub use fetch::fetch_page;
