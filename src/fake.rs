//! In-memory [`Session`] for tests.
//!
//! [`FakeSession`] keeps a tiny element tree, a window list and a dialog
//! slot behind one lock, and records every interaction so tests can assert
//! on what the engine actually did.
//!
//! Elements match a locator when it was registered with
//! [`FakeElement::matching`], or implicitly for `id=`, `name=` and `class=`
//! through the element's own attributes and for a bare tag-name `css=`.
//!
//! # Example
//!
//! ```
//! use page_engine::fake::{FakeElement, FakeSession};
//! use page_engine::By;
//!
//! let session = FakeSession::new();
//! let slider = By::css("div.slider");
//! for _ in 0..3 {
//!     session.add(FakeElement::new("div").matching(slider.clone()));
//! }
//! session.add(FakeElement::new("input").attr("id", "email"));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::time::Instant;
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::{ElementId, WindowHandle};
use crate::keyboard::Key;
use crate::locator::By;
use crate::scripts;
use crate::session::{Cookie, ScriptArg, Session};

// ============================================================================
// FakeElement
// ============================================================================

/// Element description handed to [`FakeSession::add`].
#[derive(Debug, Clone)]
pub struct FakeElement {
    tag: String,
    text: String,
    value: String,
    attributes: FxHashMap<String, String>,
    css: FxHashMap<String, String>,
    displayed: bool,
    enabled: bool,
    selected: bool,
    locators: Vec<By>,
    appears_after: Option<Duration>,
    hides_after: Option<Duration>,
}

impl FakeElement {
    /// Creates a displayed, enabled element with the given tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            text: String::new(),
            value: String::new(),
            attributes: FxHashMap::default(),
            css: FxHashMap::default(),
            displayed: true,
            enabled: true,
            selected: false,
            locators: Vec::new(),
            appears_after: None,
            hides_after: None,
        }
    }

    /// Sets the rendered text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the current value of an editable element.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets a computed CSS property.
    #[must_use]
    pub fn css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.css.insert(property.into(), value.into());
        self
    }

    /// Marks the element as present but not rendered.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Marks the element as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Marks the element as checked / selected.
    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Registers a locator this element answers to.
    #[must_use]
    pub fn matching(mut self, by: By) -> Self {
        self.locators.push(by);
        self
    }

    /// Keeps the element out of lookups until `delay` after insertion.
    #[must_use]
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    /// Stops rendering the element `delay` after insertion.
    #[must_use]
    pub fn hides_after(mut self, delay: Duration) -> Self {
        self.hides_after = Some(delay);
        self
    }

    fn matches(&self, by: &By) -> bool {
        if self.locators.contains(by) {
            return true;
        }
        let attr = |name: &str| self.attributes.get(name).map(String::as_str);
        match by {
            By::Id(id) => attr("id") == Some(id.as_str()),
            By::Name(name) => attr("name") == Some(name.as_str()),
            By::Class(class) => attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
            By::Css(selector) => *selector == self.tag,
            By::XPath(_) => false,
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// A script the engine executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedScript {
    /// Script source.
    pub script: String,
    /// Arguments in order.
    pub args: Vec<ScriptArg>,
}

/// What happened to a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    /// Accepted; carries the dialog text.
    Accepted(String),
    /// Dismissed; carries the dialog text.
    Dismissed(String),
    /// Text typed into a prompt.
    Typed(String),
}

#[derive(Debug, Clone)]
enum ScriptOutcome {
    Return(Value),
    Throw(String),
}

// ============================================================================
// Internal State
// ============================================================================

#[derive(Debug)]
struct Node {
    element: FakeElement,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    reveals: Vec<ElementId>,
    inserted: Instant,
    attached: bool,
}

impl Node {
    fn is_present(&self, now: Instant) -> bool {
        self.attached
            && self
                .element
                .appears_after
                .is_none_or(|delay| now >= self.inserted + delay)
    }

    fn is_displayed(&self, now: Instant) -> bool {
        self.element.displayed
            && self
                .element
                .hides_after
                .is_none_or(|delay| now < self.inserted + delay)
    }
}

#[derive(Debug)]
struct FakeWindow {
    handle: WindowHandle,
    title: String,
    history: Vec<String>,
    cursor: usize,
}

impl FakeWindow {
    fn new(handle: WindowHandle, title: String, url: String) -> Self {
        Self {
            handle,
            title,
            history: vec![url],
            cursor: 0,
        }
    }

    fn url(&self) -> &str {
        &self.history[self.cursor]
    }
}

#[derive(Debug)]
struct PendingAlert {
    text: String,
    opens_at: Instant,
}

#[derive(Debug)]
struct State {
    nodes: FxHashMap<ElementId, Node>,
    order: Vec<ElementId>,
    implicit_wait: Duration,
    implicit_history: Vec<Duration>,
    clicks: Vec<ElementId>,
    hovers: Vec<ElementId>,
    keys: Vec<(ElementId, String)>,
    scripts: Vec<ExecutedScript>,
    script_outcomes: FxHashMap<String, ScriptOutcome>,
    failing_lookups: Vec<By>,
    detach_on_display_check: Vec<ElementId>,
    alert: Option<PendingAlert>,
    alert_log: Vec<AlertEvent>,
    windows: Vec<FakeWindow>,
    current_window: Option<WindowHandle>,
    frame: Option<ElementId>,
    cookies: Vec<Cookie>,
    page_source: String,
}

impl State {
    fn node(&self, id: &ElementId) -> Result<&Node> {
        self.nodes
            .get(id)
            .filter(|node| node.is_present(Instant::now()))
            .ok_or_else(|| Error::stale_element(id.clone()))
    }

    fn node_mut(&mut self, id: &ElementId) -> Result<&mut Node> {
        let now = Instant::now();
        self.nodes
            .get_mut(id)
            .filter(|node| node.is_present(now))
            .ok_or_else(|| Error::stale_element(id.clone()))
    }

    fn window(&self) -> Result<&FakeWindow> {
        let handle = self.current_handle()?;
        self.windows
            .iter()
            .find(|w| w.handle == handle)
            .ok_or_else(|| Error::no_such_window(&handle))
    }

    fn window_mut(&mut self) -> Result<&mut FakeWindow> {
        let handle = self.current_handle()?;
        self.windows
            .iter_mut()
            .find(|w| w.handle == handle)
            .ok_or_else(|| Error::no_such_window(&handle))
    }

    fn current_handle(&self) -> Result<WindowHandle> {
        self.current_window
            .clone()
            .ok_or_else(|| Error::session("no current window; switch to one first"))
    }

    fn check_lookup(&self, by: &By) -> Result<()> {
        if self.failing_lookups.contains(by) {
            return Err(Error::session(format!("lookup failed: {by}")));
        }
        Ok(())
    }

    fn detach(&mut self, id: &ElementId) {
        let mut subtree = vec![id.clone()];
        self.descendants(id, &mut subtree);
        for id in subtree {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.attached = false;
            }
        }
    }

    fn descendants(&self, id: &ElementId, out: &mut Vec<ElementId>) {
        if let Some(node) = self.nodes.get(id) {
            for child in &node.children {
                out.push(child.clone());
                self.descendants(child, out);
            }
        }
    }

    fn click(&mut self, id: &ElementId) -> Result<()> {
        let node = self.node(id)?;
        let tag = node.element.tag.clone();
        let input_type = node.element.attributes.get("type").cloned();
        let parent = node.parent.clone();
        let reveals = node.reveals.clone();

        self.clicks.push(id.clone());

        match (tag.as_str(), input_type.as_deref()) {
            ("option", _) => self.select_option(id, parent.as_ref())?,
            ("input", Some("checkbox")) => {
                let node = self.node_mut(id)?;
                node.element.selected = !node.element.selected;
            }
            ("input", Some("radio")) => self.node_mut(id)?.element.selected = true,
            _ => {}
        }

        for target in reveals {
            if let Some(node) = self.nodes.get_mut(&target) {
                node.element.displayed = true;
            }
        }
        Ok(())
    }

    fn select_option(&mut self, id: &ElementId, select: Option<&ElementId>) -> Result<()> {
        let multiple = select
            .and_then(|s| self.nodes.get(s))
            .is_some_and(|s| s.element.attributes.contains_key("multiple"));

        if multiple {
            let node = self.node_mut(id)?;
            node.element.selected = !node.element.selected;
            return Ok(());
        }

        if let Some(select) = select {
            let mut options = Vec::new();
            self.descendants(select, &mut options);
            for option in options {
                if let Some(node) = self.nodes.get_mut(&option) {
                    node.element.selected = false;
                }
            }
        }
        self.node_mut(id)?.element.selected = true;
        Ok(())
    }

    fn type_keys(&mut self, id: &ElementId, text: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        let mut control = false;
        let mut all_selected = false;

        for c in text.chars() {
            match c {
                c if c == Key::Control.code_point() || c == Key::Meta.code_point() => {
                    control = true;
                }
                c if c == Key::Null.code_point() => control = false,
                'a' | 'A' if control => all_selected = true,
                c if c == Key::Delete.code_point() || c == Key::Backspace.code_point() => {
                    if all_selected {
                        node.element.value.clear();
                        all_selected = false;
                    } else if c == Key::Backspace.code_point() {
                        node.element.value.pop();
                    }
                }
                '\u{E000}'..='\u{F8FF}' => {}
                c => {
                    if all_selected {
                        node.element.value.clear();
                        all_selected = false;
                    }
                    node.element.value.push(c);
                }
            }
        }

        self.keys.push((id.clone(), text.to_string()));
        Ok(())
    }

    fn run_builtin_script(&mut self, script: &str, args: &[ScriptArg]) -> Result<Value> {
        let element = |i: usize| match args.get(i) {
            Some(ScriptArg::Element(id)) => Ok(id.clone()),
            _ => Err(Error::script_error(format!("arguments[{i}] is not an element"))),
        };
        let string = |i: usize| match args.get(i) {
            Some(ScriptArg::Value(Value::String(s))) => Ok(s.clone()),
            _ => Err(Error::script_error(format!("arguments[{i}] is not a string"))),
        };

        match script {
            scripts::CLICK => {
                self.click(&element(0)?)?;
            }
            scripts::SET_ATTRIBUTE => {
                let id = element(0)?;
                let (name, value) = (string(1)?, string(2)?);
                self.node_mut(&id)?.element.attributes.insert(name, value);
            }
            scripts::REMOVE_ATTRIBUTE => {
                let id = element(0)?;
                let name = string(1)?;
                self.node_mut(&id)?.element.attributes.remove(&name);
            }
            scripts::SCROLL_INTO_VIEW => {
                self.node(&element(0)?)?;
            }
            _ => {}
        }
        Ok(Value::Null)
    }
}

// ============================================================================
// FakeSession
// ============================================================================

/// In-memory browser session.
#[derive(Debug)]
pub struct FakeSession {
    state: Mutex<State>,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSession {
    /// Creates a session with one blank window and no elements.
    #[must_use]
    pub fn new() -> Self {
        let first = WindowHandle::generate();
        Self {
            state: Mutex::new(State {
                nodes: FxHashMap::default(),
                order: Vec::new(),
                implicit_wait: Duration::ZERO,
                implicit_history: Vec::new(),
                clicks: Vec::new(),
                hovers: Vec::new(),
                keys: Vec::new(),
                scripts: Vec::new(),
                script_outcomes: FxHashMap::default(),
                failing_lookups: Vec::new(),
                detach_on_display_check: Vec::new(),
                alert: None,
                alert_log: Vec::new(),
                windows: vec![FakeWindow::new(
                    first.clone(),
                    String::new(),
                    "about:blank".to_string(),
                )],
                current_window: Some(first),
                frame: None,
                cookies: Vec::new(),
                page_source: String::new(),
            }),
        }
    }

    // ========================================================================
    // DOM Setup
    // ========================================================================

    /// Appends a top-level element and returns its ID.
    pub fn add(&self, element: FakeElement) -> ElementId {
        self.insert(None, element)
    }

    /// Appends `element` as the last child of `parent`.
    pub fn add_child(&self, parent: &ElementId, element: FakeElement) -> ElementId {
        self.insert(Some(parent.clone()), element)
    }

    fn insert(&self, parent: Option<ElementId>, element: FakeElement) -> ElementId {
        let mut state = self.state.lock();
        let id = ElementId::generate();

        let position = match &parent {
            Some(p) => {
                let mut subtree = Vec::new();
                state.descendants(p, &mut subtree);
                let last = subtree.last().unwrap_or(p);
                state
                    .order
                    .iter()
                    .position(|e| e == last)
                    .map_or(state.order.len(), |i| i + 1)
            }
            None => state.order.len(),
        };
        state.order.insert(position, id.clone());

        if let Some(p) = &parent
            && let Some(node) = state.nodes.get_mut(p)
        {
            node.children.push(id.clone());
        }

        state.nodes.insert(
            id.clone(),
            Node {
                element,
                parent,
                children: Vec::new(),
                reveals: Vec::new(),
                inserted: Instant::now(),
                attached: true,
            },
        );
        id
    }

    /// Detaches an element and its subtree; later use reports it stale.
    pub fn remove(&self, id: &ElementId) {
        self.state.lock().detach(id);
    }

    /// Detaches an element at its next display check.
    ///
    /// Lookups still find it; the `is_displayed` call that follows reports
    /// it stale, as when the page re-renders between the two.
    pub fn detach_on_display_check(&self, id: &ElementId) {
        self.state.lock().detach_on_display_check.push(id.clone());
    }

    /// Shows or hides an element.
    pub fn set_displayed(&self, id: &ElementId, displayed: bool) {
        if let Some(node) = self.state.lock().nodes.get_mut(id) {
            node.element.displayed = displayed;
        }
    }

    /// Enables or disables an element.
    pub fn set_enabled(&self, id: &ElementId, enabled: bool) {
        if let Some(node) = self.state.lock().nodes.get_mut(id) {
            node.element.enabled = enabled;
        }
    }

    /// Makes a click on `trigger` display `target`.
    pub fn reveal_on_click(&self, trigger: &ElementId, target: &ElementId) {
        if let Some(node) = self.state.lock().nodes.get_mut(trigger) {
            node.reveals.push(target.clone());
        }
    }

    /// Fails every lookup of `by` with a session error.
    pub fn fail_lookups(&self, by: By) {
        self.state.lock().failing_lookups.push(by);
    }

    // ========================================================================
    // Scripts, Dialogs, Windows
    // ========================================================================

    /// Makes `script` return `value`.
    pub fn set_script_result(&self, script: impl Into<String>, value: Value) {
        self.state
            .lock()
            .script_outcomes
            .insert(script.into(), ScriptOutcome::Return(value));
    }

    /// Makes `script` throw `message`.
    pub fn fail_script(&self, script: impl Into<String>, message: impl Into<String>) {
        self.state
            .lock()
            .script_outcomes
            .insert(script.into(), ScriptOutcome::Throw(message.into()));
    }

    /// Opens a dialog now.
    pub fn open_alert(&self, text: impl Into<String>) {
        self.open_alert_after(text, Duration::ZERO);
    }

    /// Opens a dialog `delay` from now.
    pub fn open_alert_after(&self, text: impl Into<String>, delay: Duration) {
        self.state.lock().alert = Some(PendingAlert {
            text: text.into(),
            opens_at: Instant::now() + delay,
        });
    }

    /// Opens another window and returns its handle. The current window is
    /// unchanged.
    pub fn add_window(&self, title: impl Into<String>, url: impl Into<String>) -> WindowHandle {
        let mut state = self.state.lock();
        let handle = WindowHandle::generate();
        state
            .windows
            .push(FakeWindow::new(handle.clone(), title.into(), url.into()));
        handle
    }

    /// Sets the current window's title.
    pub fn set_title(&self, title: impl Into<String>) {
        if let Ok(window) = self.state.lock().window_mut() {
            window.title = title.into();
        }
    }

    /// Sets the document source.
    pub fn set_page_source(&self, source: impl Into<String>) {
        self.state.lock().page_source = source.into();
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Current implicit wait.
    #[must_use]
    pub fn implicit_wait(&self) -> Duration {
        self.state.lock().implicit_wait
    }

    /// Every implicit wait set, in order.
    #[must_use]
    pub fn implicit_wait_history(&self) -> Vec<Duration> {
        self.state.lock().implicit_history.clone()
    }

    /// Clicked elements, in order.
    #[must_use]
    pub fn clicks(&self) -> Vec<ElementId> {
        self.state.lock().clicks.clone()
    }

    /// Hovered elements, in order.
    #[must_use]
    pub fn hovers(&self) -> Vec<ElementId> {
        self.state.lock().hovers.clone()
    }

    /// Raw `send_keys` payloads delivered to `id`, in order.
    #[must_use]
    pub fn keys_sent(&self, id: &ElementId) -> Vec<String> {
        self.state
            .lock()
            .keys
            .iter()
            .filter(|(target, _)| target == id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Executed scripts, in order.
    #[must_use]
    pub fn scripts(&self) -> Vec<ExecutedScript> {
        self.state.lock().scripts.clone()
    }

    /// Current value of an editable element.
    #[must_use]
    pub fn value_of(&self, id: &ElementId) -> Option<String> {
        self.state
            .lock()
            .nodes
            .get(id)
            .map(|node| node.element.value.clone())
    }

    /// Attribute as stored, regardless of presence.
    #[must_use]
    pub fn attribute_of(&self, id: &ElementId, name: &str) -> Option<String> {
        self.state
            .lock()
            .nodes
            .get(id)
            .and_then(|node| node.element.attributes.get(name).cloned())
    }

    /// Dialog interactions, in order.
    #[must_use]
    pub fn alert_log(&self) -> Vec<AlertEvent> {
        self.state.lock().alert_log.clone()
    }

    /// Frame element the session is switched into, if any.
    #[must_use]
    pub fn current_frame(&self) -> Option<ElementId> {
        self.state.lock().frame.clone()
    }

    /// Number of open windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }
}

// ============================================================================
// Session Implementation
// ============================================================================

#[async_trait]
impl Session for FakeSession {
    async fn navigate(&self, url: &Url) -> Result<()> {
        let mut state = self.state.lock();
        let window = state.window_mut()?;
        window.history.truncate(window.cursor + 1);
        window.history.push(url.to_string());
        window.cursor += 1;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().window()?.url().to_string())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.state.lock().window()?.title.clone())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.state.lock().page_source.clone())
    }

    async fn back(&self) -> Result<()> {
        let mut state = self.state.lock();
        let window = state.window_mut()?;
        window.cursor = window.cursor.saturating_sub(1);
        Ok(())
    }

    async fn forward(&self) -> Result<()> {
        let mut state = self.state.lock();
        let window = state.window_mut()?;
        if window.cursor + 1 < window.history.len() {
            window.cursor += 1;
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.state.lock().window()?;
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<Cookie>> {
        Ok(self.state.lock().cookies.clone())
    }

    async fn add_cookie(&self, cookie: &Cookie) -> Result<()> {
        let mut state = self.state.lock();
        state.cookies.retain(|c| c.name != cookie.name);
        state.cookies.push(cookie.clone());
        Ok(())
    }

    async fn window_handle(&self) -> Result<WindowHandle> {
        Ok(self.state.lock().window()?.handle.clone())
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        let state = self.state.lock();
        Ok(state.windows.iter().map(|w| w.handle.clone()).collect())
    }

    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
        let mut state = self.state.lock();
        if !state.windows.iter().any(|w| &w.handle == handle) {
            return Err(Error::no_such_window(handle));
        }
        state.current_window = Some(handle.clone());
        state.frame = None;
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        let mut state = self.state.lock();
        let handle = state.window()?.handle.clone();
        state.windows.retain(|w| w.handle != handle);
        state.current_window = None;
        Ok(())
    }

    async fn switch_to_frame(&self, frame: &ElementId) -> Result<()> {
        let mut state = self.state.lock();
        state.node(frame)?;
        state.frame = Some(frame.clone());
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.state.lock().frame = None;
        Ok(())
    }

    async fn alert_text(&self) -> Result<String> {
        let state = self.state.lock();
        state
            .alert
            .as_ref()
            .filter(|alert| Instant::now() >= alert.opens_at)
            .map(|alert| alert.text.clone())
            .ok_or(Error::NoSuchAlert)
    }

    async fn accept_alert(&self) -> Result<()> {
        let mut state = self.state.lock();
        let text = take_alert(&mut state)?;
        state.alert_log.push(AlertEvent::Accepted(text));
        Ok(())
    }

    async fn dismiss_alert(&self) -> Result<()> {
        let mut state = self.state.lock();
        let text = take_alert(&mut state)?;
        state.alert_log.push(AlertEvent::Dismissed(text));
        Ok(())
    }

    async fn send_alert_text(&self, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        if !state
            .alert
            .as_ref()
            .is_some_and(|alert| Instant::now() >= alert.opens_at)
        {
            return Err(Error::NoSuchAlert);
        }
        state.alert_log.push(AlertEvent::Typed(text.to_string()));
        Ok(())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        let mut state = self.state.lock();
        state.scripts.push(ExecutedScript {
            script: script.to_string(),
            args: args.clone(),
        });

        match state.script_outcomes.get(script).cloned() {
            Some(ScriptOutcome::Return(value)) => Ok(value),
            Some(ScriptOutcome::Throw(message)) => Err(Error::script_error(message)),
            None => state.run_builtin_script(script, &args),
        }
    }

    async fn set_implicit_wait(&self, duration: Duration) -> Result<()> {
        let mut state = self.state.lock();
        state.implicit_wait = duration;
        state.implicit_history.push(duration);
        Ok(())
    }

    async fn find_element(&self, by: &By) -> Result<ElementId> {
        self.find_elements(by)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::no_such_element(by.to_string()))
    }

    async fn find_elements(&self, by: &By) -> Result<Vec<ElementId>> {
        let state = self.state.lock();
        state.check_lookup(by)?;
        let now = Instant::now();
        Ok(state
            .order
            .iter()
            .filter(|id| {
                state
                    .nodes
                    .get(*id)
                    .is_some_and(|node| node.is_present(now) && node.element.matches(by))
            })
            .cloned()
            .collect())
    }

    async fn find_elements_within(&self, parent: &ElementId, by: &By) -> Result<Vec<ElementId>> {
        let state = self.state.lock();
        state.check_lookup(by)?;
        state.node(parent)?;
        let now = Instant::now();
        let mut subtree = Vec::new();
        state.descendants(parent, &mut subtree);
        subtree.retain(|id| {
            state
                .nodes
                .get(id)
                .is_some_and(|node| node.is_present(now) && node.element.matches(by))
        });
        Ok(subtree)
    }

    async fn click(&self, element: &ElementId) -> Result<()> {
        self.state.lock().click(element)
    }

    async fn clear(&self, element: &ElementId) -> Result<()> {
        self.state.lock().node_mut(element)?.element.value.clear();
        Ok(())
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<()> {
        self.state.lock().type_keys(element, text)
    }

    async fn hover(&self, element: &ElementId) -> Result<()> {
        let mut state = self.state.lock();
        state.node(element)?;
        state.hovers.push(element.clone());
        Ok(())
    }

    async fn text(&self, element: &ElementId) -> Result<String> {
        Ok(self.state.lock().node(element)?.element.text.clone())
    }

    async fn attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>> {
        let state = self.state.lock();
        let node = state.node(element)?;
        if name == "value" {
            return Ok(Some(node.element.value.clone()));
        }
        Ok(node.element.attributes.get(name).cloned())
    }

    async fn css_value(&self, element: &ElementId, property: &str) -> Result<String> {
        let state = self.state.lock();
        let node = state.node(element)?;
        Ok(node.element.css.get(property).cloned().unwrap_or_default())
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool> {
        let mut state = self.state.lock();
        if let Some(i) = state
            .detach_on_display_check
            .iter()
            .position(|id| id == element)
        {
            state.detach_on_display_check.swap_remove(i);
            state.detach(element);
        }
        Ok(state.node(element)?.is_displayed(Instant::now()))
    }

    async fn is_enabled(&self, element: &ElementId) -> Result<bool> {
        Ok(self.state.lock().node(element)?.element.enabled)
    }

    async fn is_selected(&self, element: &ElementId) -> Result<bool> {
        Ok(self.state.lock().node(element)?.element.selected)
    }
}

/// Takes the open dialog's text, closing it.
fn take_alert(state: &mut State) -> Result<String> {
    match state.alert.take() {
        Some(alert) if Instant::now() >= alert.opens_at => Ok(alert.text),
        pending => {
            state.alert = pending;
            Err(Error::NoSuchAlert)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
