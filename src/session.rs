//! Browser-session capability set.
//!
//! [`Session`] is the seam between the engine and whatever drives the
//! browser. The engine never launches or quits a browser; it borrows a
//! session that is already open and issues one command at a time.
//!
//! Element primitives take an [`ElementId`] obtained from `find_element` /
//! `find_elements` in the same engine call. Implementations should report a
//! detached node as [`Error::StaleElement`](crate::Error::StaleElement), an
//! empty single lookup as [`Error::NoSuchElement`](crate::Error::NoSuchElement)
//! and a missing dialog as [`Error::NoSuchAlert`](crate::Error::NoSuchAlert);
//! the wait engine relies on those three to keep polling.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::identifiers::{ElementId, WindowHandle};
use crate::locator::By;

// ============================================================================
// Cookie
// ============================================================================

/// Browser cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Secure flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// HttpOnly flag.
    #[serde(rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// SameSite attribute.
    #[serde(rename = "sameSite", skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    /// Expiry (seconds since the epoch).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
}

impl Cookie {
    /// Creates a new cookie with name and value.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
            expiry: None,
        }
    }

    /// Sets the domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

// ============================================================================
// ScriptArg
// ============================================================================

/// Argument passed to a script as `arguments[i]`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    /// Element reference; arrives in the script as the DOM node.
    Element(ElementId),
    /// Plain JSON value.
    Value(Value),
}

impl From<ElementId> for ScriptArg {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<&ElementId> for ScriptArg {
    fn from(id: &ElementId) -> Self {
        Self::Element(id.clone())
    }
}

impl From<&str> for ScriptArg {
    fn from(s: &str) -> Self {
        Self::Value(Value::String(s.to_string()))
    }
}

impl From<String> for ScriptArg {
    fn from(s: String) -> Self {
        Self::Value(Value::String(s))
    }
}

impl From<Value> for ScriptArg {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

// ============================================================================
// Session Trait
// ============================================================================

/// Remote-controllable browser session.
///
/// One session is driven by one caller at a time; implementations need not
/// serialize concurrent use.
#[async_trait]
pub trait Session: Send + Sync {
    // ========================================================================
    // Navigation
    // ========================================================================

    /// Loads `url` in the current window.
    async fn navigate(&self, url: &Url) -> Result<()>;

    /// Returns the current document URL.
    async fn current_url(&self) -> Result<String>;

    /// Returns the current document title.
    async fn title(&self) -> Result<String>;

    /// Returns the serialized current document.
    async fn page_source(&self) -> Result<String>;

    /// Goes back one history entry.
    async fn back(&self) -> Result<()>;

    /// Goes forward one history entry.
    async fn forward(&self) -> Result<()>;

    /// Reloads the current document.
    async fn refresh(&self) -> Result<()>;

    // ========================================================================
    // Cookies
    // ========================================================================

    /// Returns all cookies visible to the current document.
    async fn cookies(&self) -> Result<Vec<Cookie>>;

    /// Adds a cookie.
    async fn add_cookie(&self, cookie: &Cookie) -> Result<()>;

    // ========================================================================
    // Windows & Frames
    // ========================================================================

    /// Returns the handle of the current window.
    async fn window_handle(&self) -> Result<WindowHandle>;

    /// Returns all window handles.
    async fn window_handles(&self) -> Result<Vec<WindowHandle>>;

    /// Makes `handle` the current window.
    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()>;

    /// Closes the current window.
    async fn close_window(&self) -> Result<()>;

    /// Switches into the frame owned by `frame` (an `<iframe>` element).
    async fn switch_to_frame(&self, frame: &ElementId) -> Result<()>;

    /// Switches back to the top-level document.
    async fn switch_to_default_content(&self) -> Result<()>;

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Returns the open dialog's message.
    async fn alert_text(&self) -> Result<String>;

    /// Accepts the open dialog.
    async fn accept_alert(&self) -> Result<()>;

    /// Dismisses the open dialog.
    async fn dismiss_alert(&self) -> Result<()>;

    /// Types into the open prompt dialog.
    async fn send_alert_text(&self, text: &str) -> Result<()>;

    // ========================================================================
    // Scripts & Timeouts
    // ========================================================================

    /// Runs `script` as a function body with `args` bound to `arguments`.
    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value>;

    /// Sets the ambient implicit wait applied to element lookups.
    async fn set_implicit_wait(&self, duration: Duration) -> Result<()>;

    // ========================================================================
    // Element Lookup
    // ========================================================================

    /// Returns the first element matching `by` in document order.
    async fn find_element(&self, by: &By) -> Result<ElementId>;

    /// Returns every element matching `by` in document order.
    ///
    /// Zero matches is an empty vector, not an error.
    async fn find_elements(&self, by: &By) -> Result<Vec<ElementId>>;

    /// Returns descendants of `parent` matching `by` in document order.
    async fn find_elements_within(&self, parent: &ElementId, by: &By) -> Result<Vec<ElementId>>;

    // ========================================================================
    // Element Primitives
    // ========================================================================

    /// Clicks the element.
    async fn click(&self, element: &ElementId) -> Result<()>;

    /// Clears an editable element's value.
    async fn clear(&self, element: &ElementId) -> Result<()>;

    /// Types `text` (which may contain key code points) into the element.
    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<()>;

    /// Moves the pointer over the element.
    async fn hover(&self, element: &ElementId) -> Result<()>;

    /// Returns the element's rendered text.
    async fn text(&self, element: &ElementId) -> Result<String>;

    /// Returns an attribute (or property) value; `None` when absent.
    async fn attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>>;

    /// Returns a computed CSS property value.
    async fn css_value(&self, element: &ElementId, property: &str) -> Result<String>;

    /// Returns `true` if the element is rendered with a non-zero size.
    async fn is_displayed(&self, element: &ElementId) -> Result<bool>;

    /// Returns `true` if the element is not disabled.
    async fn is_enabled(&self, element: &ElementId) -> Result<bool>;

    /// Returns `true` for a checked checkbox/radio or selected option.
    async fn is_selected(&self, element: &ElementId) -> Result<bool>;
}

// ============================================================================
// Tests
// ============================================================================
