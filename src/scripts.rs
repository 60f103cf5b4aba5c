//! Script sources dispatched through [`Session::execute_script`].
//!
//! Each script is a function body; element arguments arrive as
//! `arguments[0]`, further values follow in order.
//!
//! [`Session::execute_script`]: crate::Session::execute_script

// ============================================================================
// Element Scripts
// ============================================================================

/// Clicks `arguments[0]` without pointer simulation.
pub const CLICK: &str = "arguments[0].click();";

/// Scrolls `arguments[0]` to the top of the viewport.
pub const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView(true);";

/// Sets attribute `arguments[1]` of `arguments[0]` to `arguments[2]`.
pub const SET_ATTRIBUTE: &str = "arguments[0].setAttribute(arguments[1], arguments[2]);";

/// Removes attribute `arguments[1]` from `arguments[0]`.
pub const REMOVE_ATTRIBUTE: &str = "arguments[0].removeAttribute(arguments[1]);";

/// Reads the constraint-validation message of a form control.
pub const VALIDATION_MESSAGE: &str = "return arguments[0].validationMessage;";

/// True once an `<img>` has finished loading with a real bitmap.
pub const IMAGE_LOADED: &str = "return arguments[0].complete \
     && typeof arguments[0].naturalWidth != \"undefined\" \
     && arguments[0].naturalWidth > 0;";

// ============================================================================
// Page Scripts
// ============================================================================

/// Scrolls the window to the bottom of the document.
pub const SCROLL_TO_BOTTOM: &str = "window.scrollBy(0, document.body.scrollHeight);";

/// Number of in-flight jQuery requests. Throws when jQuery is absent.
pub const JQUERY_ACTIVE: &str = "return jQuery.active;";

/// Current `document.readyState`.
pub const DOCUMENT_READY_STATE: &str = "return document.readyState;";

/// Inline style applied by highlighting.
pub const HIGHLIGHT_STYLE: &str = "border: 2px solid red; border-style: dashed;";
