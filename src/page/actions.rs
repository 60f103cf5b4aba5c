//! Native element actions.
//!
//! Actions resolve their target once and act on it. They never wait on
//! their own; call a `wait_for_*` first when the element may not be ready.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::keyboard::{Key, chord};
use crate::locator::ToLocator;
use crate::session::Session;

use super::BasePage;

// ============================================================================
// BasePage - Actions
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Clicks the first match.
    pub async fn click(&self, target: impl ToLocator) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, "Clicking");
        self.session.click(&id).await
    }

    /// Clears the first match, then types `text` into it.
    pub async fn send_keys(&self, target: impl ToLocator, text: &str) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, len = text.len(), "Typing");
        self.session.clear(&id).await?;
        self.session.send_keys(&id, text).await
    }

    /// Clears the first match with Ctrl+A, Delete.
    ///
    /// For rich editors that ignore a plain clear.
    pub async fn clear_by_delete_key(&self, target: impl ToLocator) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, "Clearing with select-all and delete");
        let keys = chord(&[Key::Control.as_str(), "a", Key::Delete.as_str()]);
        self.session.send_keys(&id, &keys).await
    }

    /// Moves the pointer over the first match.
    pub async fn hover(&self, target: impl ToLocator) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, "Hovering");
        self.session.hover(&id).await
    }

    /// Sends a single key to the first match, without clearing it.
    pub async fn press_key(&self, target: impl ToLocator, key: Key) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, ?key, "Pressing key");
        self.session.send_keys(&id, key.as_str()).await
    }

    /// Checks a checkbox or radio. No-op when already checked.
    pub async fn check(&self, target: impl ToLocator) -> Result<()> {
        self.set_checked(target, true).await
    }

    /// Unchecks a checkbox. No-op when already unchecked.
    pub async fn uncheck(&self, target: impl ToLocator) -> Result<()> {
        self.set_checked(target, false).await
    }

    async fn set_checked(&self, target: impl ToLocator, checked: bool) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        if self.session.is_selected(&id).await? == checked {
            debug!(element_id = %id, checked, "Already in requested state");
            return Ok(());
        }
        debug!(element_id = %id, checked, "Toggling");
        self.session.click(&id).await
    }

    /// Sends several file paths to a file input in one go.
    ///
    /// The input must accept multiple files for more than one path.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `paths` is empty.
    pub async fn upload_files<P: AsRef<Path>>(
        &self,
        target: impl ToLocator,
        paths: &[P],
    ) -> Result<()> {
        if paths.is_empty() {
            return Err(Error::invalid_argument("upload_files needs at least one path"));
        }
        let joined = paths
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, count = paths.len(), "Uploading files");
        self.session.send_keys(&id, &joined).await
    }
}

// ============================================================================
// Tests
// ============================================================================
