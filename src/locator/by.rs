//! Element locator strategies.
//!
//! Provides Selenium-like `By` selectors, plus parsing of the compact
//! `<prefix>=<value>` string form page-object maps are written in.
//!
//! # Example
//!
//! ```
//! use page_engine::{By, Strategy};
//!
//! let by = By::parse("XPATH=//button[@type='submit']").unwrap();
//! assert_eq!(by.strategy(), Strategy::XPath);
//! assert_eq!(by.value(), "//button[@type='submit']");
//!
//! // Declared once as a typed constant instead of a string
//! let email = By::name("email");
//! assert_eq!(email.to_string(), "name=email");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Strategy
// ============================================================================

/// Lookup strategy understood by the session's element finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// `id` attribute.
    Id,
    /// Single class name.
    Class,
    /// `name` attribute.
    Name,
    /// CSS selector.
    Css,
    /// XPath expression.
    XPath,
}

impl Strategy {
    /// Every supported strategy, in prefix-matching order.
    pub const ALL: [Strategy; 5] = [
        Strategy::Id,
        Strategy::Class,
        Strategy::Name,
        Strategy::Css,
        Strategy::XPath,
    ];

    /// Returns the strategy name for the session protocol.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Class => "class",
            Self::Name => "name",
            Self::Css => "css",
            Self::XPath => "xpath",
        }
    }

    /// Looks up a strategy by its locator prefix, ignoring ASCII case.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// By Enum
// ============================================================================

/// Element locator (strategy plus raw value).
///
/// Values are passed to the session untouched; no quoting or escaping is
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// Element ID.
    ///
    /// # Example
    /// ```ignore
    /// By::Id("username")
    /// ```
    #[serde(rename = "id")]
    Id(String),

    /// Class name (single class).
    ///
    /// # Example
    /// ```ignore
    /// By::Class("btn-primary")
    /// ```
    #[serde(rename = "class")]
    Class(String),

    /// Name attribute.
    ///
    /// # Example
    /// ```ignore
    /// By::Name("email")
    /// ```
    #[serde(rename = "name")]
    Name(String),

    /// CSS selector.
    ///
    /// # Example
    /// ```ignore
    /// By::Css("button.primary")
    /// By::Css("[data-testid='submit']")
    /// ```
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```ignore
    /// By::XPath("//a[text()='Login']")
    /// ```
    #[serde(rename = "xpath")]
    XPath(String),
}

impl By {
    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a class name selector.
    #[inline]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Builds a locator from an already-resolved strategy.
    #[must_use]
    pub fn from_parts(strategy: Strategy, value: impl Into<String>) -> Self {
        let value = value.into();
        match strategy {
            Strategy::Id => Self::Id(value),
            Strategy::Class => Self::Class(value),
            Strategy::Name => Self::Name(value),
            Strategy::Css => Self::Css(value),
            Strategy::XPath => Self::XPath(value),
        }
    }

    /// Parses the `<prefix>=<value>` form.
    ///
    /// The prefix is one of `id`, `class`, `name`, `css`, `xpath` in any
    /// letter case; everything after the first `=` is the value, verbatim.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedLocatorKind`] when the prefix is missing or
    /// unknown. There is no fallback strategy.
    pub fn parse(raw: &str) -> Result<Self> {
        let (prefix, value) = raw
            .split_once('=')
            .ok_or_else(|| Error::unsupported_locator(raw))?;
        let strategy =
            Strategy::from_prefix(prefix).ok_or_else(|| Error::unsupported_locator(raw))?;
        Ok(Self::from_parts(strategy, value))
    }

    /// Returns the lookup strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Id(_) => Strategy::Id,
            Self::Class(_) => Strategy::Class,
            Self::Name(_) => Strategy::Name,
            Self::Css(_) => Strategy::Css,
            Self::XPath(_) => Strategy::XPath,
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Class(v) | Self::Name(v) | Self::Css(v) | Self::XPath(v) => v,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl FromStr for By {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for By {
    /// Renders the `<prefix>=<value>` form accepted by [`By::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::{any, prop_assert, prop_assert_eq, prop_assume, proptest};

    #[test]
    fn test_parse_each_prefix() {
        assert_eq!(By::parse("id=username").unwrap(), By::id("username"));
        assert_eq!(By::parse("class=btn").unwrap(), By::class("btn"));
        assert_eq!(By::parse("name=email").unwrap(), By::name("email"));
        assert_eq!(By::parse("css=div > a").unwrap(), By::css("div > a"));
        assert_eq!(By::parse("xpath=//a").unwrap(), By::xpath("//a"));
    }

    #[test]
    fn test_parse_keeps_value_verbatim() {
        let by = By::parse("css=a[href='/?q=1']").unwrap();
        assert_eq!(by.value(), "a[href='/?q=1']");

        let by = By::parse("xpath=").unwrap();
        assert_eq!(by.value(), "");
    }

    #[test]
    fn test_parse_rejects_unknown_prefix() {
        let err = By::parse("link=Home").unwrap_err();
        assert!(matches!(err, Error::UnsupportedLocatorKind { ref locator } if locator == "link=Home"));
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        assert!(matches!(
            By::parse("//div[@id='x']"),
            Err(Error::UnsupportedLocatorKind { .. })
        ));
        assert!(matches!(
            By::parse("#login"),
            Err(Error::UnsupportedLocatorKind { .. })
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        let by = By::xpath("//li[contains(@class,'tab')]");
        assert_eq!(By::parse(&by.to_string()).unwrap(), by);
    }

    #[test]
    fn test_from_str() {
        let by: By = "Name=q".parse().unwrap();
        assert!(matches!(by, By::Name(_)));
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(By::css("#x")).unwrap();
        assert_eq!(json, serde_json::json!({"strategy": "css", "value": "#x"}));
    }

    proptest! {
        #[test]
        fn prop_prefix_is_case_insensitive(
            index in 0usize..5,
            value in "[a-z0-9/\\[\\]@'=]{0,16}",
            casing in any::<u32>(),
        ) {
            let strategy = Strategy::ALL[index];
            let prefix: String = strategy
                .as_str()
                .chars()
                .enumerate()
                .map(|(i, c)| if casing & (1 << i) != 0 { c.to_ascii_uppercase() } else { c })
                .collect();
            let by = By::parse(&format!("{prefix}={value}")).unwrap();
            prop_assert_eq!(by.strategy(), strategy);
            prop_assert_eq!(by.value(), value.as_str());
        }

        #[test]
        fn prop_unknown_prefix_is_rejected(prefix in "[a-z]{1,8}") {
            prop_assume!(Strategy::from_prefix(&prefix).is_none());
            let result = By::parse(&format!("{prefix}=value"));
            prop_assert!(
                matches!(result, Err(Error::UnsupportedLocatorKind { .. })),
                "expected UnsupportedLocatorKind, got {:?}",
                result
            );
        }
    }
}
