//! Element state and content reads.

use tracing::debug;

use crate::color::rgba_to_hex;
use crate::error::{Error, Result};
use crate::locator::ToLocator;
use crate::session::Session;

use super::BasePage;

// ============================================================================
// BasePage - Content
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Returns an attribute of the first match, `None` when absent.
    pub async fn element_attribute(
        &self,
        target: impl ToLocator,
        name: &str,
    ) -> Result<Option<String>> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        self.session.attribute(&id, name).await
    }

    /// Returns the rendered text of the first match.
    pub async fn element_text(&self, target: impl ToLocator) -> Result<String> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        self.session.text(&id).await
    }

    /// Returns a computed CSS property of the first match.
    pub async fn element_css_value(&self, target: impl ToLocator, property: &str) -> Result<String> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        self.session.css_value(&id, property).await
    }

    /// Returns a colour property of the first match as `#rrggbb`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the property is not a colour.
    pub async fn element_css_color_hex(
        &self,
        target: impl ToLocator,
        property: &str,
    ) -> Result<String> {
        let value = self.element_css_value(target, property).await?;
        rgba_to_hex(&value)
    }

    /// Number of elements currently matching `target`.
    pub async fn element_count(&self, target: impl ToLocator) -> Result<usize> {
        let by = target.to_locator()?;
        Ok(self.elements(&by).await?.len())
    }
}

// ============================================================================
// BasePage - State
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Returns `true` if the first match is displayed.
    ///
    /// A missing or detached element is reported as `false`, not an error.
    pub async fn is_displayed(&self, target: impl ToLocator) -> Result<bool> {
        let by = target.to_locator()?;
        match self.element(&by).await {
            Ok(id) => self.hidden_or_gone(&id).await.map(|hidden| !hidden),
            Err(Error::NoSuchElement { .. }) => {
                debug!(strategy = %by.strategy(), value = by.value(), "Not found, not displayed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Fast-fail absence probe.
    ///
    /// Shortens the implicit wait, takes one snapshot of the matches and
    /// restores the long tier. Returns `true` when nothing matches or the
    /// first match is hidden. Later matches are not inspected.
    ///
    /// # Errors
    ///
    /// [`Error::TimeoutOverrideActive`] when called inside another override;
    /// session failures propagate after the implicit wait is restored.
    pub async fn is_undisplayed(&self, target: impl ToLocator) -> Result<bool> {
        let by = target.to_locator()?;
        self.short_implicit_wait()
            .run(|| async {
                let ids = self.elements(&by).await?;
                match ids.first() {
                    None => Ok(true),
                    Some(first) => self.hidden_or_gone(first).await,
                }
            })
            .await
    }

    /// Returns `true` if the first match is enabled.
    pub async fn is_enabled(&self, target: impl ToLocator) -> Result<bool> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        self.session.is_enabled(&id).await
    }

    /// Returns `true` if the first match is checked or selected.
    pub async fn is_selected(&self, target: impl ToLocator) -> Result<bool> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        self.session.is_selected(&id).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fake::{FakeElement, FakeSession};
    use crate::locator::By;

    #[tokio::test]
    async fn test_content_reads() {
        let session = FakeSession::new();
        session.add(
            FakeElement::new("span")
                .attr("id", "price")
                .attr("data-currency", "EUR")
                .text("12.50")
                .css("color", "rgba(255, 0, 51, 1)"),
        );
        let page = BasePage::new(&session);
        assert_eq!(page.element_text("id=price").await.unwrap(), "12.50");
        assert_eq!(
            page.element_attribute("id=price", "data-currency").await.unwrap(),
            Some("EUR".to_string())
        );
        assert_eq!(page.element_attribute("id=price", "title").await.unwrap(), None);
        assert_eq!(
            page.element_css_color_hex("id=price", "color").await.unwrap(),
            "#ff0033"
        );
    }

    #[tokio::test]
    async fn test_non_colour_css_value() {
        let session = FakeSession::new();
        session.add(FakeElement::new("span").attr("id", "x").css("display", "block"));
        let page = BasePage::new(&session);
        assert!(matches!(
            page.element_css_color_hex("id=x", "display").await,
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_element_count() {
        let session = FakeSession::new();
        for _ in 0..4 {
            session.add(FakeElement::new("div").matching(By::css("div.card")));
        }
        let page = BasePage::new(&session);
        assert_eq!(page.element_count("css=div.card").await.unwrap(), 4);
        assert_eq!(page.element_count("css=div.none").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_is_displayed_missing_is_false() {
        let session = FakeSession::new();
        let page = BasePage::new(&session);
        assert!(!page.is_displayed("id=ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_displayed_hidden_is_false() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("id", "modal").hidden());
        let page = BasePage::new(&session);
        assert!(!page.is_displayed("id=modal").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_displayed_propagates_locator_errors() {
        let session = FakeSession::new();
        let page = BasePage::new(&session);
        assert!(page.is_displayed("link=Home").await.is_err());
    }

    #[tokio::test]
    async fn test_is_undisplayed_cases() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("class", "hidden-first").hidden());
        session.add(FakeElement::new("div").attr("class", "hidden-first"));
        session.add(FakeElement::new("div").attr("class", "shown"));
        let page = BasePage::new(&session);

        assert!(page.is_undisplayed("class=absent").await.unwrap());
        assert!(page.is_undisplayed("class=hidden-first").await.unwrap());
        assert!(!page.is_undisplayed("class=shown").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_undisplayed_restores_long_tier() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("id", "toast"));
        let page = BasePage::new(&session);
        page.is_undisplayed("id=toast").await.unwrap();
        assert_eq!(session.implicit_wait(), page.config().long_timeout());
        assert_eq!(
            session.implicit_wait_history(),
            vec![page.config().short_timeout(), page.config().long_timeout()]
        );
    }

    #[tokio::test]
    async fn test_is_undisplayed_restores_after_failure() {
        let session = FakeSession::new();
        session.fail_lookups(By::id("flaky"));
        let page = BasePage::new(&session);
        assert!(matches!(
            page.is_undisplayed("id=flaky").await,
            Err(Error::Session { .. })
        ));
        assert_eq!(session.implicit_wait(), page.config().long_timeout());
    }

    #[tokio::test]
    async fn test_enabled_and_selected() {
        let session = FakeSession::new();
        session.add(FakeElement::new("button").attr("id", "buy").disabled());
        session.add(
            FakeElement::new("input")
                .attr("type", "radio")
                .attr("id", "express")
                .selected(),
        );
        let page = BasePage::new(&session);
        assert!(!page.is_enabled("id=buy").await.unwrap());
        assert!(page.is_selected("id=express").await.unwrap());
        assert!(matches!(
            page.is_enabled("id=ghost").await,
            Err(Error::NoSuchElement { .. })
        ));
    }

    #[tokio::test]
    async fn test_detached_between_lookup_and_check_is_not_displayed() {
        let session = FakeSession::new();
        let id = session.add(FakeElement::new("div").attr("id", "toast"));
        session.detach_on_display_check(&id);
        let page = BasePage::new(&session);
        assert!(!page.is_displayed("id=toast").await.unwrap());
    }

    #[tokio::test]
    async fn test_detached_between_lookup_and_check_is_undisplayed() {
        let session = FakeSession::new();
        let id = session.add(FakeElement::new("div").attr("id", "toast"));
        session.detach_on_display_check(&id);
        let page = BasePage::new(&session);
        assert!(page.is_undisplayed("id=toast").await.unwrap());
        assert_eq!(session.implicit_wait(), page.config().long_timeout());
    }

    #[tokio::test]
    async fn test_second_engine_cannot_nest_override() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("id", "toast"));
        let outer = BasePage::new(&session);
        let inner = BasePage::new(&session);

        let nested = outer
            .short_implicit_wait()
            .run(|| inner.is_undisplayed("id=toast"))
            .await;
        assert!(matches!(nested, Err(Error::TimeoutOverrideActive)));
        assert_eq!(session.implicit_wait(), outer.config().long_timeout());

        assert!(!inner.is_undisplayed("id=toast").await.unwrap());
    }
}
