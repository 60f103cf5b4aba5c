//! CSS colour value conversion.
//!
//! Sessions report computed colours as `rgb(...)` / `rgba(...)` strings;
//! assertions are usually written against hex.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// ============================================================================
// Patterns
// ============================================================================

static RGB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(0|1|0?\.\d+|1\.0+)\s*)?\)\s*$",
    )
    .expect("valid rgb pattern")
});

static RGB_PCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*rgba?\(\s*(\d{1,3}(?:\.\d+)?)%\s*,\s*(\d{1,3}(?:\.\d+)?)%\s*,\s*(\d{1,3}(?:\.\d+)?)%\s*(?:,\s*(0|1|0?\.\d+|1\.0+)\s*)?\)\s*$",
    )
    .expect("valid rgb percent pattern")
});

static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})\s*$").expect("valid hex pattern")
});

// ============================================================================
// Conversion
// ============================================================================

/// Converts a CSS colour string to lowercase `#rrggbb`.
///
/// Accepts `rgb()`/`rgba()` with integer or percentage channels, `#rgb`,
/// `#rrggbb` and `transparent`. The alpha channel is dropped.
///
/// ```
/// use page_engine::color::rgba_to_hex;
///
/// assert_eq!(rgba_to_hex("rgba(255, 0, 51, 1)").unwrap(), "#ff0033");
/// ```
///
/// # Errors
///
/// [`Error::InvalidArgument`] for anything else, or channels above 255.
pub fn rgba_to_hex(value: &str) -> Result<String> {
    let (r, g, b) = parse_rgb(value)?;
    Ok(format!("#{r:02x}{g:02x}{b:02x}"))
}

fn parse_rgb(value: &str) -> Result<(u8, u8, u8)> {
    if value.trim().eq_ignore_ascii_case("transparent") {
        return Ok((0, 0, 0));
    }

    if let Some(caps) = RGB.captures(value) {
        let channel = |i: usize| -> Result<u8> {
            caps[i]
                .parse::<u8>()
                .map_err(|_| Error::invalid_argument(format!("Colour channel out of range: {value}")))
        };
        return Ok((channel(1)?, channel(2)?, channel(3)?));
    }

    if let Some(caps) = RGB_PCT.captures(value) {
        let channel = |i: usize| -> Result<u8> {
            let pct: f64 = caps[i]
                .parse()
                .map_err(|_| Error::invalid_argument(format!("Bad colour channel: {value}")))?;
            if pct > 100.0 {
                return Err(Error::invalid_argument(format!(
                    "Colour channel out of range: {value}"
                )));
            }
            Ok((pct / 100.0 * 255.0).floor() as u8)
        };
        return Ok((channel(1)?, channel(2)?, channel(3)?));
    }

    if let Some(caps) = HEX.captures(value) {
        let digits = &caps[1];
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| Error::invalid_argument(format!("Bad hex colour: {value}")))
        };
        return Ok((channel(0)?, channel(2)?, channel(4)?));
    }

    Err(Error::invalid_argument(format!(
        "Unrecognised colour value: {value}"
    )))
}

// ============================================================================
// Tests
// ============================================================================
