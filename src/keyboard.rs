//! Keyboard key definitions and utilities.
//!
//! Keys are sent through the session's `send_keys` channel as the private-use
//! code points the WebDriver protocol reserves for them.
//!
//! # Example
//!
//! ```ignore
//! use page_engine::Key;
//!
//! // Navigation keys
//! page.press_key("id=search", Key::Enter).await?;
//!
//! // Ctrl+A then Delete, modifiers released at the end
//! let clear = page_engine::keyboard::chord(&[Key::Control.as_str(), "a", Key::Delete.as_str()]);
//! ```

// ============================================================================
// Key Enum
// ============================================================================

/// Special keyboard keys.
///
/// For typing text, pass the text itself to `send_keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // ========================================================================
    // Navigation & Control
    // ========================================================================
    /// Enter key
    Enter,
    /// Return key
    Return,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Insert key
    Insert,
    /// Space bar
    Space,

    // ========================================================================
    // Arrow Keys
    // ========================================================================
    /// Arrow Up
    ArrowUp,
    /// Arrow Down
    ArrowDown,
    /// Arrow Left
    ArrowLeft,
    /// Arrow Right
    ArrowRight,

    // ========================================================================
    // Page Navigation
    // ========================================================================
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,

    // ========================================================================
    // Modifiers
    // ========================================================================
    /// Shift modifier
    Shift,
    /// Control modifier
    Control,
    /// Alt modifier
    Alt,
    /// Meta (Command / Windows) modifier
    Meta,
    /// Releases all held modifiers
    Null,
}

impl Key {
    /// Returns the WebDriver code point for this key.
    #[must_use]
    pub const fn code_point(self) -> char {
        match self {
            Key::Null => '\u{E000}',
            Key::Backspace => '\u{E003}',
            Key::Tab => '\u{E004}',
            Key::Return => '\u{E006}',
            Key::Enter => '\u{E007}',
            Key::Shift => '\u{E008}',
            Key::Control => '\u{E009}',
            Key::Alt => '\u{E00A}',
            Key::Escape => '\u{E00C}',
            Key::Space => '\u{E00D}',
            Key::PageUp => '\u{E00E}',
            Key::PageDown => '\u{E00F}',
            Key::End => '\u{E010}',
            Key::Home => '\u{E011}',
            Key::ArrowLeft => '\u{E012}',
            Key::ArrowUp => '\u{E013}',
            Key::ArrowRight => '\u{E014}',
            Key::ArrowDown => '\u{E015}',
            Key::Insert => '\u{E016}',
            Key::Delete => '\u{E017}',
            Key::Meta => '\u{E03D}',
        }
    }

    /// Returns the key as a one-character string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Key::Null => "\u{E000}",
            Key::Backspace => "\u{E003}",
            Key::Tab => "\u{E004}",
            Key::Return => "\u{E006}",
            Key::Enter => "\u{E007}",
            Key::Shift => "\u{E008}",
            Key::Control => "\u{E009}",
            Key::Alt => "\u{E00A}",
            Key::Escape => "\u{E00C}",
            Key::Space => "\u{E00D}",
            Key::PageUp => "\u{E00E}",
            Key::PageDown => "\u{E00F}",
            Key::End => "\u{E010}",
            Key::Home => "\u{E011}",
            Key::ArrowLeft => "\u{E012}",
            Key::ArrowUp => "\u{E013}",
            Key::ArrowRight => "\u{E014}",
            Key::ArrowDown => "\u{E015}",
            Key::Insert => "\u{E016}",
            Key::Delete => "\u{E017}",
            Key::Meta => "\u{E03D}",
        }
    }

    /// Returns `true` for keys that stay held until [`Key::Null`].
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(self, Key::Shift | Key::Control | Key::Alt | Key::Meta)
    }
}

/// Joins key sequences into one chord and releases modifiers at the end.
///
/// ```
/// use page_engine::Key;
/// use page_engine::keyboard::chord;
///
/// let select_all = chord(&[Key::Control.as_str(), "a"]);
/// assert!(select_all.ends_with(Key::Null.code_point()));
/// ```
#[must_use]
pub fn chord(parts: &[&str]) -> String {
    let mut out: String = parts.concat();
    out.push(Key::Null.code_point());
    out
}

// ============================================================================
// Tests
// ============================================================================
