//! Parameterized ("dynamic") locators.
//!
//! A template is a raw locator containing `%s` slots that are filled
//! positionally. Substitution is an XPath-only feature: for any other
//! prefix the raw string is used as-is and arguments are ignored.
//!
//! # Example
//!
//! ```
//! use page_engine::{By, LocatorTemplate};
//!
//! let link = LocatorTemplate::new("xpath=//a[text()='%s']");
//! assert_eq!(link.slots(), 1);
//! assert_eq!(link.bind(&["Shop"]).unwrap(), By::xpath("//a[text()='Shop']"));
//! assert!(link.bind::<&str>(&[]).is_err());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::error::{Error, Result};

use super::by::{By, Strategy};

// ============================================================================
// Segment
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot,
}

/// Splits a raw locator into literal text and `%s` slots.
///
/// `%%` is a literal `%`; any other `%` sequence is kept as written.
fn segments(raw: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                if !literal.is_empty() {
                    out.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                out.push(Segment::Slot);
            }
            Some('%') => {
                chars.next();
                literal.push('%');
            }
            _ => literal.push('%'),
        }
    }

    if !literal.is_empty() {
        out.push(Segment::Literal(literal));
    }
    out
}

/// Returns `true` if `raw` carries the `xpath=` prefix (any case).
fn is_xpath(raw: &str) -> bool {
    raw.split_once('=')
        .and_then(|(prefix, _)| Strategy::from_prefix(prefix))
        == Some(Strategy::XPath)
}

// ============================================================================
// LocatorTemplate
// ============================================================================

/// Raw locator with positional `%s` slots.
///
/// The slot count is recorded at construction so argument mismatches are
/// reported before any string is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorTemplate {
    raw: String,
    segments: Vec<Segment>,
    dynamic: bool,
}

impl LocatorTemplate {
    /// Creates a template from a raw locator.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let dynamic = is_xpath(&raw);
        let segments = if dynamic { segments(&raw) } else { Vec::new() };
        Self {
            raw,
            segments,
            dynamic,
        }
    }

    /// Returns the raw template string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if substitution applies (XPath prefix).
    #[inline]
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Number of `%s` slots. Always zero for non-XPath templates.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Slot))
            .count()
    }

    /// Fills the slots with `args`, in order.
    ///
    /// Non-XPath templates come back unchanged whatever `args` holds.
    ///
    /// # Errors
    ///
    /// [`Error::LocatorTemplateMismatch`] when `args.len()` differs from
    /// [`slots`](Self::slots), in either direction.
    pub fn expand<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        if !self.dynamic {
            return Ok(self.raw.clone());
        }

        let expected = self.slots();
        if args.len() != expected {
            return Err(Error::template_mismatch(&self.raw, expected, args.len()));
        }

        let mut args = args.iter();
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot => {
                    // Count checked above.
                    if let Some(arg) = args.next() {
                        out.push_str(arg.as_ref());
                    }
                }
            }
        }
        Ok(out)
    }

    /// Expands and parses in one step.
    ///
    /// # Errors
    ///
    /// Everything [`expand`](Self::expand) and [`By::parse`] return.
    pub fn bind<S: AsRef<str>>(&self, args: &[S]) -> Result<By> {
        By::parse(&self.expand(args)?)
    }
}

impl fmt::Display for LocatorTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Expands a raw locator with positional arguments.
///
/// Shorthand for `LocatorTemplate::new(raw).expand(args)`.
///
/// # Errors
///
/// [`Error::LocatorTemplateMismatch`] for an XPath locator whose slot count
/// differs from `args.len()`.
pub fn expand<S: AsRef<str>>(raw: &str, args: &[S]) -> Result<String> {
    LocatorTemplate::new(raw).expand(args)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::{prop_assert_eq, proptest};

    #[test]
    fn test_expand_single_slot() {
        let out = expand("xpath=//a[text()='%s']", &["Shop"]).unwrap();
        assert_eq!(out, "xpath=//a[text()='Shop']");
    }

    #[test]
    fn test_expand_multiple_slots_in_order() {
        let out = expand("xpath=//tr[%s]/td[text()='%s']", &["2", "Price"]).unwrap();
        assert_eq!(out, "xpath=//tr[2]/td[text()='Price']");
    }

    #[test]
    fn test_expand_missing_argument_fails() {
        let err = expand::<&str>("xpath=//a[text()='%s']", &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::LocatorTemplateMismatch {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_expand_surplus_argument_fails() {
        let err = expand("xpath=//a[text()='%s']", &["a", "b"]).unwrap_err();
        assert!(matches!(
            err,
            Error::LocatorTemplateMismatch {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_non_xpath_ignores_args() {
        let out = expand("css=li.%s", &["active"]).unwrap();
        assert_eq!(out, "css=li.%s");

        let out = expand("id=cart", &["x", "y"]).unwrap();
        assert_eq!(out, "id=cart");
    }

    #[test]
    fn test_xpath_prefix_any_case_is_dynamic() {
        let template = LocatorTemplate::new("XPath=//h2[normalize-space()='%s']");
        assert!(template.is_dynamic());
        assert_eq!(
            template.bind(&["Reviews"]).unwrap(),
            By::xpath("//h2[normalize-space()='Reviews']")
        );
    }

    #[test]
    fn test_percent_escape() {
        let template = LocatorTemplate::new("xpath=//span[text()='%s%%']");
        assert_eq!(template.slots(), 1);
        assert_eq!(
            template.expand(&["50"]).unwrap(),
            "xpath=//span[text()='50%']"
        );
    }

    #[test]
    fn test_static_xpath_needs_no_args() {
        let template = LocatorTemplate::new("xpath=//button");
        assert_eq!(template.slots(), 0);
        assert_eq!(template.expand::<&str>(&[]).unwrap(), "xpath=//button");
    }

    #[test]
    fn test_bind_rejects_unknown_prefix() {
        let template = LocatorTemplate::new("link=%s");
        assert!(!template.is_dynamic());
        assert!(matches!(
            template.bind(&["Home"]),
            Err(Error::UnsupportedLocatorKind { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_slot_count_must_match(slots in 0usize..6, given in 0usize..6) {
            let raw = format!("xpath=//div{}", "[@a='%s']".repeat(slots));
            let args: Vec<String> = (0..given).map(|i| format!("v{i}")).collect();
            let result = expand(&raw, args.as_slice());
            prop_assert_eq!(result.is_ok(), slots == given);
        }
    }
}
