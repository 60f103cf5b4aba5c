//! Page engine - locator-driven element interaction for browser tests.
//!
//! This library gives page objects one engine to write against: raw
//! locator strings in, waits with two timeout tiers, and an action/query
//! surface over whatever drives the browser.
//!
//! # Architecture
//!
//! A call flows through four layers, leaves first:
//!
//! - **Locator**: `"<strategy>=<value>"` parsed into [`By`], with `%s`
//!   templates expanded for XPath
//! - **Resolution**: the live document is queried on every call, nothing is cached
//! - **Wait**: one polling loop for every condition, long and short tiers
//! - **Surface**: click, type, select, read, plus script-dispatched variants
//!
//! The browser itself sits behind the [`Session`] trait. The engine borrows
//! an open session; launching and quitting browsers happens elsewhere.
//!
//! # Quick Start
//!
//! ```
//! use page_engine::fake::{FakeElement, FakeSession};
//! use page_engine::{BasePage, By, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = FakeSession::new();
//!     for _ in 0..3 {
//!         session.add(FakeElement::new("div").matching(By::css("div.slide")));
//!     }
//!
//!     let page = BasePage::new(&session);
//!     page.wait_for_visible("css=div.slide").await?;
//!     assert_eq!(page.element_count("css=div.slide").await?, 3);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`locator`] | [`By`], [`LocatorTemplate`], [`Dynamic`] targets |
//! | [`page`] | [`BasePage`] engine and [`PageConfig`] |
//! | [`wait`] | Timeout tiers, conditions, polling |
//! | [`session`] | [`Session`] trait, [`Cookie`], [`ScriptArg`] |
//! | [`fake`] | In-memory [`FakeSession`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`keyboard`] | [`Key`] code points and chords |
//! | [`color`] | CSS colour to hex |
//! | [`scripts`] | Script sources sent to the session |

// ============================================================================
// Modules
// ============================================================================

/// CSS colour conversion.
pub mod color;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// In-memory session for tests.
pub mod fake;

/// Type-safe identifiers for session entities.
pub mod identifiers;

/// Keyboard keys.
pub mod keyboard;

/// Locator grammar and templates.
pub mod locator;

/// The page engine.
///
/// Use [`BasePage::new`] over an open session.
pub mod page;

/// Script sources.
pub mod scripts;

/// Browser-session capability set.
pub mod session;

/// Timeout tiers, conditions and polling.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Engine types
pub use page::{BasePage, PageConfig, PageConfigBuilder};

// Locator types
pub use locator::{By, Dynamic, LocatorTemplate, Strategy, ToLocator};

// Session types
pub use session::{Cookie, ScriptArg, Session};

// Test double
pub use fake::FakeSession;

// Wait types
pub use wait::{ConditionKind, TimeoutTier};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, WindowHandle};

// Keyboard
pub use keyboard::Key;
