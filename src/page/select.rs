//! Native `<select>` controls and scripted dropdowns.

use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::{By, ToLocator};
use crate::scripts;
use crate::session::Session;
use crate::wait::{ConditionKind, TimeoutTier, WaitSpec};

use super::BasePage;

// ============================================================================
// BasePage - Native Select
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Selects the option whose visible text equals `text` exactly.
    ///
    /// On a multi-select every matching option is selected.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatchingOption`] if no option has that text.
    pub async fn select_by_visible_text(&self, target: impl ToLocator, text: &str) -> Result<()> {
        let by = target.to_locator()?;
        let select = self.element(&by).await?;
        let multiple = self.multiple(&select).await?;
        debug!(element_id = %select, text, multiple, "Selecting by visible text");

        let mut matched = false;
        for option in self.options(&select).await? {
            if self.session.text(&option).await? != text {
                continue;
            }
            if !self.session.is_selected(&option).await? {
                self.session.click(&option).await?;
            }
            matched = true;
            if !multiple {
                break;
            }
        }

        if matched {
            Ok(())
        } else {
            Err(Error::no_matching_option(by.to_string(), text))
        }
    }

    /// Returns the text of the first selected option.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] if nothing is selected.
    pub async fn first_selected_option_text(&self, target: impl ToLocator) -> Result<String> {
        let by = target.to_locator()?;
        let select = self.element(&by).await?;
        for option in self.options(&select).await? {
            if self.session.is_selected(&option).await? {
                return self.session.text(&option).await;
            }
        }
        Err(Error::no_such_element(format!("selected option of {by}")))
    }

    /// Returns `true` if the select accepts several selections.
    pub async fn is_dropdown_multiple(&self, target: impl ToLocator) -> Result<bool> {
        let by = target.to_locator()?;
        let select = self.element(&by).await?;
        self.multiple(&select).await
    }

    async fn options(&self, select: &ElementId) -> Result<Vec<ElementId>> {
        self.session
            .find_elements_within(select, &By::css("option"))
            .await
    }

    async fn multiple(&self, select: &ElementId) -> Result<bool> {
        let value = self.session.attribute(select, "multiple").await?;
        Ok(value.is_some_and(|v| v != "false"))
    }
}

// ============================================================================
// BasePage - Custom Dropdown
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Opens a scripted dropdown and clicks the option with the given text.
    ///
    /// Clicks `parent`, waits (long tier) for `options` to be present, then
    /// scrolls to and clicks the first option, in document order, whose
    /// trimmed text equals `expected`.
    ///
    /// # Errors
    ///
    /// - [`Error::WaitTimeout`] if the option list never appears
    /// - [`Error::NoMatchingOption`] if no option has that text
    pub async fn select_from_custom_dropdown(
        &self,
        parent: impl ToLocator,
        options: impl ToLocator,
        expected: &str,
    ) -> Result<()> {
        let parent = parent.to_locator()?;
        let options = options.to_locator()?;

        let trigger = self.element(&parent).await?;
        self.session.click(&trigger).await?;

        let spec = WaitSpec::new(ConditionKind::PresenceOfAll, TimeoutTier::Long);
        let items = self.wait_for(spec, &options).await?;
        debug!(count = items.len(), expected, "Scanning dropdown options");

        for item in &items {
            if self.session.text(item).await?.trim() != expected {
                continue;
            }
            self.session
                .execute_script(scripts::SCROLL_INTO_VIEW, vec![item.into()])
                .await?;
            debug!(element_id = %item, "Clicking dropdown option");
            return self.session.click(item).await;
        }

        Err(Error::no_matching_option(options.to_string(), expected))
    }
}

// ============================================================================
// Tests
// ============================================================================
