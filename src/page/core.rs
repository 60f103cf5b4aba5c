//! Engine struct and element resolution.

use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::identifiers::ElementId;
use crate::locator::{By, ToLocator};
use crate::session::Session;
use crate::wait::{ImplicitWaitScope, millis};

use super::PageConfig;

// ============================================================================
// BasePage
// ============================================================================

/// Locator-driven interaction engine over a borrowed session.
///
/// Nothing found is kept between calls: every operation resolves its
/// locator against the live document.
///
/// Several engines may borrow one session. They share its implicit wait,
/// so a short-tier override opened by one makes the others' overrides fail
/// with [`Error::TimeoutOverrideActive`](crate::Error::TimeoutOverrideActive)
/// until it ends.
pub struct BasePage<'s, S: Session + ?Sized> {
    pub(super) session: &'s S,
    pub(super) config: PageConfig,
}

impl<S: Session + ?Sized> fmt::Debug for BasePage<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasePage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'s, S: Session + ?Sized> BasePage<'s, S> {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(session: &'s S) -> Self {
        Self::with_config(session, PageConfig::default())
    }

    /// Creates an engine with `config`.
    #[must_use]
    pub fn with_config(session: &'s S, config: PageConfig) -> Self {
        Self {
            session,
            config,
        }
    }

    /// Returns the underlying session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &'s S {
        self.session
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Sets the session's implicit wait to the long tier.
    ///
    /// Call once after the session is opened; short-tier probes restore to
    /// this value.
    pub async fn apply_implicit_wait(&self) -> Result<()> {
        debug!(
            long_ms = millis(self.config.long_timeout()),
            "Applying implicit wait"
        );
        self.session
            .set_implicit_wait(self.config.long_timeout())
            .await
    }

    /// Scope that swaps the implicit wait to the short tier.
    pub(super) fn short_implicit_wait(&self) -> ImplicitWaitScope<'_, S> {
        ImplicitWaitScope::new(
            self.session,
            self.config.short_timeout(),
            self.config.long_timeout(),
        )
    }
}

// ============================================================================
// BasePage - Resolution
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Returns the first element matching `target`.
    ///
    /// # Errors
    ///
    /// - Locator errors from parsing `target`
    /// - [`Error::NoSuchElement`](crate::Error::NoSuchElement) on zero matches
    pub async fn find_one(&self, target: impl ToLocator) -> Result<ElementId> {
        let by = target.to_locator()?;
        self.element(&by).await
    }

    /// Returns every element matching `target`, in document order.
    ///
    /// Zero matches is an empty vector.
    pub async fn find_all(&self, target: impl ToLocator) -> Result<Vec<ElementId>> {
        let by = target.to_locator()?;
        self.elements(&by).await
    }

    pub(super) async fn element(&self, by: &By) -> Result<ElementId> {
        debug!(strategy = %by.strategy(), value = by.value(), "Finding element");
        let id = self.session.find_element(by).await?;
        debug!(strategy = %by.strategy(), element_id = %id, "Found element");
        Ok(id)
    }

    pub(super) async fn elements(&self, by: &By) -> Result<Vec<ElementId>> {
        debug!(strategy = %by.strategy(), value = by.value(), "Finding elements");
        let ids = self.session.find_elements(by).await?;
        debug!(strategy = %by.strategy(), count = ids.len(), "Found elements");
        Ok(ids)
    }
}

// ============================================================================
// Tests
// ============================================================================
