//! Error types for the page engine.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use page_engine::{BasePage, Result};
//!
//! async fn example(page: &BasePage<'_, impl Session>) -> Result<()> {
//!     page.wait_for_clickable("id=submit").await?;
//!     page.click("id=submit").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Locator | [`Error::UnsupportedLocatorKind`], [`Error::LocatorTemplateMismatch`] |
//! | Element | [`Error::NoSuchElement`], [`Error::StaleElement`], [`Error::NoMatchingOption`] |
//! | Waiting | [`Error::WaitTimeout`], [`Error::TimeoutOverrideActive`] |
//! | Session | [`Error::NoSuchAlert`], [`Error::NoSuchWindow`], [`Error::ScriptError`], [`Error::Session`] |
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | External | [`Error::Json`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::{ElementId, WindowHandle};
use crate::wait::{ConditionKind, TimeoutTier};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes the context a test report needs to tell failures
/// apart (the locator, the condition, the tier that elapsed).
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Locator Errors
    // ========================================================================
    /// Locator string has no recognised strategy prefix.
    ///
    /// Returned by [`By::parse`](crate::By::parse) and by every operation
    /// that accepts a raw locator string.
    #[error("Locator type not supported: {locator}")]
    UnsupportedLocatorKind {
        /// The raw locator as supplied.
        locator: String,
    },

    /// Dynamic arguments do not fit the template's `%s` slots.
    #[error("Locator template {template} expects {expected} argument(s), got {actual}")]
    LocatorTemplateMismatch {
        /// The raw template.
        template: String,
        /// Number of `%s` slots in the template.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    // ========================================================================
    // Element Errors
    // ========================================================================
    /// No element matched a single-element lookup.
    #[error("No such element: {locator}")]
    NoSuchElement {
        /// Locator in its raw `<prefix>=<value>` form.
        locator: String,
    },

    /// Element handle no longer refers to a node in the document.
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's ID.
        element_id: ElementId,
    },

    /// No option of a dropdown has the requested visible text.
    #[error("No option with text '{text}' in {locator}")]
    NoMatchingOption {
        /// Locator of the dropdown.
        locator: String,
        /// Requested visible text.
        text: String,
    },

    // ========================================================================
    // Wait Errors
    // ========================================================================
    /// Condition was not satisfied before the tier elapsed.
    #[error("Timed out after {timeout_ms}ms ({tier} tier) waiting for {condition}: {target}")]
    WaitTimeout {
        /// Condition that was polled.
        condition: ConditionKind,
        /// Timeout tier that elapsed.
        tier: TimeoutTier,
        /// Milliseconds waited.
        timeout_ms: u64,
        /// What was being waited on (locator or page).
        target: String,
    },

    /// An implicit-wait override is already active on this engine.
    #[error("Implicit wait is already overridden")]
    TimeoutOverrideActive,

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// No native dialog is open.
    #[error("No alert is open")]
    NoSuchAlert,

    /// Window handle not found.
    #[error("No such window: {handle}")]
    NoSuchWindow {
        /// The missing handle or the title that matched nothing.
        handle: String,
    },

    /// Script execution failed in the browser.
    #[error("Script error: {message}")]
    ScriptError {
        /// Error message from script execution.
        message: String,
    },

    /// Opaque failure reported by the browser session.
    #[error("Session error: {message}")]
    Session {
        /// Description from the session.
        message: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when engine configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON conversion error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an unsupported locator kind error.
    #[inline]
    pub fn unsupported_locator(locator: impl Into<String>) -> Self {
        Self::UnsupportedLocatorKind {
            locator: locator.into(),
        }
    }

    /// Creates a template mismatch error.
    #[inline]
    pub fn template_mismatch(template: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LocatorTemplateMismatch {
            template: template.into(),
            expected,
            actual,
        }
    }

    /// Creates a no such element error.
    #[inline]
    pub fn no_such_element(locator: impl Into<String>) -> Self {
        Self::NoSuchElement {
            locator: locator.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates a no matching option error.
    #[inline]
    pub fn no_matching_option(locator: impl Into<String>, text: impl Into<String>) -> Self {
        Self::NoMatchingOption {
            locator: locator.into(),
            text: text.into(),
        }
    }

    /// Creates a wait timeout error.
    #[inline]
    pub fn wait_timeout(
        condition: ConditionKind,
        tier: TimeoutTier,
        timeout_ms: u64,
        target: impl Into<String>,
    ) -> Self {
        Self::WaitTimeout {
            condition,
            tier,
            timeout_ms,
            target: target.into(),
        }
    }

    /// Creates a no such window error.
    #[inline]
    pub fn no_such_window(handle: &WindowHandle) -> Self {
        Self::NoSuchWindow {
            handle: handle.to_string(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    /// Creates a session error.
    #[inline]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a wait timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }

    /// Returns `true` if this is an element error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::NoSuchElement { .. } | Self::StaleElement { .. } | Self::NoMatchingOption { .. }
        )
    }

    /// Returns `true` if the locator itself is malformed.
    #[inline]
    #[must_use]
    pub fn is_locator_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLocatorKind { .. } | Self::LocatorTemplateMismatch { .. }
        )
    }

    /// Returns `true` if a polling wait should keep going after this error.
    ///
    /// Everything else aborts the wait and propagates unmodified.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NoSuchElement { .. } | Self::StaleElement { .. } | Self::NoSuchAlert
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
