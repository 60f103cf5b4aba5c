//! The page engine.
//!
//! [`BasePage`] borrows an open [`Session`](crate::Session) and exposes the
//! action, query and wait surface page objects are written against. Page
//! objects hold a reference to one engine rather than extending it.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | [`PageConfig`] and its builder |
//! | `core` | Engine struct, element resolution |
//! | `waits` | `wait_for_*` family |
//! | `actions` | Click, typing, hover, checkboxes, uploads |
//! | `queries` | Text, attribute, CSS and state reads |
//! | `select` | Native and custom dropdowns |
//! | `script` | Script-dispatched variants, page readiness |
//! | `navigation` | URLs, history, cookies, alerts, windows, frames |
//!
//! # Example
//!
//! ```ignore
//! use page_engine::{BasePage, Result, Session};
//!
//! const SEARCH_BOX: &str = "id=search";
//! const RESULT_LINK: &str = "xpath=//a[text()='%s']";
//!
//! struct SearchPage<'p, S: Session + ?Sized> {
//!     page: &'p BasePage<'p, S>,
//! }
//!
//! impl<S: Session + ?Sized> SearchPage<'_, S> {
//!     async fn search(&self, term: &str) -> Result<()> {
//!         self.page.wait_for_visible(SEARCH_BOX).await?;
//!         self.page.send_keys(SEARCH_BOX, term).await?;
//!         self.page.press_key(SEARCH_BOX, page_engine::Key::Enter).await
//!     }
//!
//!     async fn open_result(&self, title: &str) -> Result<()> {
//!         let link = page_engine::locator::dynamic(RESULT_LINK, [title]);
//!         self.page.wait_for_clickable(&link).await?;
//!         self.page.click(&link).await
//!     }
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod actions;
mod config;
mod core;
mod navigation;
mod queries;
mod script;
mod select;
mod waits;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{
    DEFAULT_HIGHLIGHT_DURATION, DEFAULT_LONG_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_SHORT_TIMEOUT, PageConfig, PageConfigBuilder,
};
pub use self::core::BasePage;
