//! Locator grammar.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`By`] | Parsed locator: strategy plus value |
//! | [`Strategy`] | `id`, `class`, `name`, `css`, `xpath` |
//! | [`LocatorTemplate`] | XPath locator with `%s` slots |
//! | [`Dynamic`] | Template paired with its arguments |
//! | [`ToLocator`] | Anything an engine operation accepts as a target |
//!
//! Every engine operation takes `impl ToLocator`, so the same call works
//! with a raw string constant, a typed [`By`], or a [`Dynamic`] pair:
//!
//! ```
//! use page_engine::locator::{dynamic, ToLocator};
//! use page_engine::By;
//!
//! assert_eq!("id=cart".to_locator().unwrap(), By::id("cart"));
//! assert_eq!(
//!     dynamic("xpath=//li[contains(@class,'%s')]", ["reviews_tab"]).to_locator().unwrap(),
//!     By::xpath("//li[contains(@class,'reviews_tab')]"),
//! );
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod by;
mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use by::{By, Strategy};
pub use template::{LocatorTemplate, expand};

use std::fmt;

use crate::error::{Error, Result};

// ============================================================================
// ToLocator
// ============================================================================

/// Converts an operation target into a parsed [`By`].
///
/// Conversion happens once per call; nothing is cached.
pub trait ToLocator {
    /// Resolves the target to a locator.
    ///
    /// # Errors
    ///
    /// Locator errors: unsupported prefix, template mismatch.
    fn to_locator(&self) -> Result<By>;
}

impl ToLocator for By {
    fn to_locator(&self) -> Result<By> {
        Ok(self.clone())
    }
}

impl ToLocator for str {
    fn to_locator(&self) -> Result<By> {
        By::parse(self)
    }
}

impl ToLocator for String {
    fn to_locator(&self) -> Result<By> {
        By::parse(self)
    }
}

impl<T: ToLocator + ?Sized> ToLocator for &T {
    fn to_locator(&self) -> Result<By> {
        (**self).to_locator()
    }
}

// ============================================================================
// Dynamic
// ============================================================================

/// Raw locator plus positional arguments, expanded on use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dynamic {
    template: LocatorTemplate,
    args: Vec<String>,
}

impl Dynamic {
    /// Pairs a template with its arguments.
    ///
    /// The argument count is checked when the target is resolved. Use
    /// [`try_new`](Self::try_new) to check it here instead.
    #[must_use]
    pub fn new(template: LocatorTemplate, args: Vec<String>) -> Self {
        Self { template, args }
    }

    /// Pairs a template with its arguments, checking the count up front.
    ///
    /// # Errors
    ///
    /// [`Error::LocatorTemplateMismatch`] when an XPath template's slot
    /// count differs from `args.len()`.
    pub fn try_new(template: LocatorTemplate, args: Vec<String>) -> Result<Self> {
        let expected = template.slots();
        if template.is_dynamic() && args.len() != expected {
            return Err(Error::template_mismatch(template.as_str(), expected, args.len()));
        }
        Ok(Self { template, args })
    }

    /// Returns the arguments.
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl ToLocator for Dynamic {
    fn to_locator(&self) -> Result<By> {
        self.template.bind(self.args.as_slice())
    }
}

impl fmt::Display for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.template, self.args)
    }
}

/// Builds a [`Dynamic`] target from a raw locator and its arguments.
pub fn dynamic<I, S>(raw: impl Into<String>, args: I) -> Dynamic
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Dynamic::new(
        LocatorTemplate::new(raw),
        args.into_iter().map(Into::into).collect(),
    )
}

/// Like [`dynamic`], but fails at construction on an argument-count mismatch.
///
/// # Errors
///
/// [`Error::LocatorTemplateMismatch`] for an XPath locator whose slot count
/// differs from the number of arguments.
pub fn try_dynamic<I, S>(raw: impl Into<String>, args: I) -> Result<Dynamic>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Dynamic::try_new(
        LocatorTemplate::new(raw),
        args.into_iter().map(Into::into).collect(),
    )
}

// ============================================================================
// Tests
// ============================================================================
