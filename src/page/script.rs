//! Script-dispatched element operations and page readiness.

use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::ToLocator;
use crate::scripts;
use crate::session::{ScriptArg, Session};
use crate::wait::{ConditionKind, TimeoutTier, WaitSpec, poll_until};

use super::BasePage;

// ============================================================================
// BasePage - Element Scripts
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Clicks the first match through a script, bypassing overlays.
    pub async fn click_via_script(&self, target: impl ToLocator) -> Result<()> {
        self.run_on(target, scripts::CLICK, Vec::new()).await.map(drop)
    }

    /// Scrolls the first match into view.
    pub async fn scroll_into_view_via_script(&self, target: impl ToLocator) -> Result<()> {
        self.run_on(target, scripts::SCROLL_INTO_VIEW, Vec::new())
            .await
            .map(drop)
    }

    /// Outlines the first match for the configured highlight duration.
    ///
    /// The element's original `style` attribute is put back afterwards.
    pub async fn highlight_via_script(&self, target: impl ToLocator) -> Result<()> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        let original = self.session.attribute(&id, "style").await?.unwrap_or_default();

        debug!(element_id = %id, "Highlighting");
        self.set_attribute(&id, "style", scripts::HIGHLIGHT_STYLE).await?;
        sleep(self.config.highlight_duration()).await;
        self.set_attribute(&id, "style", &original).await
    }

    /// Returns the browser's constraint-validation message for a form control.
    ///
    /// Empty when the control is valid.
    pub async fn read_validation_message_via_script(&self, target: impl ToLocator) -> Result<String> {
        match self.run_on(target, scripts::VALIDATION_MESSAGE, Vec::new()).await? {
            Value::String(message) => Ok(message),
            Value::Null => Ok(String::new()),
            other => Err(Error::script_error(format!(
                "validation message is not a string: {other}"
            ))),
        }
    }

    /// Returns `true` if an `<img>` has loaded with a non-zero natural width.
    pub async fn is_image_loaded_via_script(&self, target: impl ToLocator) -> Result<bool> {
        let value = self.run_on(target, scripts::IMAGE_LOADED, Vec::new()).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Removes an attribute from the first match.
    pub async fn remove_attribute_via_script(
        &self,
        target: impl ToLocator,
        attribute: &str,
    ) -> Result<()> {
        self.run_on(target, scripts::REMOVE_ATTRIBUTE, vec![attribute.into()])
            .await
            .map(drop)
    }

    async fn run_on(
        &self,
        target: impl ToLocator,
        script: &str,
        extra: Vec<ScriptArg>,
    ) -> Result<Value> {
        let by = target.to_locator()?;
        let id = self.element(&by).await?;
        debug!(element_id = %id, script, "Executing element script");
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(ScriptArg::Element(id));
        args.extend(extra);
        self.session.execute_script(script, args).await
    }

    async fn set_attribute(&self, id: &ElementId, name: &str, value: &str) -> Result<()> {
        self.session
            .execute_script(
                scripts::SET_ATTRIBUTE,
                vec![id.into(), name.into(), value.into()],
            )
            .await
            .map(drop)
    }
}

// ============================================================================
// BasePage - Page Scripts
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Scrolls the window to the bottom of the document.
    pub async fn scroll_to_bottom_via_script(&self) -> Result<()> {
        debug!("Scrolling to bottom");
        self.session
            .execute_script(scripts::SCROLL_TO_BOTTOM, Vec::new())
            .await
            .map(drop)
    }

    /// Waits (long tier, each) until jQuery is idle and the document is
    /// complete.
    ///
    /// A page without jQuery, or where the check throws, counts as idle.
    ///
    /// # Errors
    ///
    /// - [`Error::WaitTimeout`] naming whichever signal never settled
    /// - Script errors from the ready-state check
    pub async fn wait_for_page_ready(&self) -> Result<()> {
        let timeout = self.config.long_timeout();
        let interval = self.config.poll_interval();

        poll_until(
            WaitSpec::new(ConditionKind::AjaxIdle, TimeoutTier::Long),
            timeout,
            interval,
            "page",
            || async {
                match self
                    .session
                    .execute_script(scripts::JQUERY_ACTIVE, Vec::new())
                    .await
                {
                    Ok(active) => Ok(active.as_i64().is_none_or(|n| n == 0).then_some(())),
                    Err(e) => {
                        debug!(error = %e, "jQuery unavailable, treating as idle");
                        Ok(Some(()))
                    }
                }
            },
        )
        .await?;

        poll_until(
            WaitSpec::new(ConditionKind::DocumentReady, TimeoutTier::Long),
            timeout,
            interval,
            "page",
            || async {
                let state = self
                    .session
                    .execute_script(scripts::DOCUMENT_READY_STATE, Vec::new())
                    .await?;
                Ok((state.as_str() == Some("complete")).then_some(()))
            },
        )
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;

    use crate::fake::{FakeElement, FakeSession};
    use crate::page::PageConfig;

    fn quick(session: &FakeSession) -> BasePage<'_, FakeSession> {
        let config = PageConfig::builder()
            .long_timeout(Duration::from_millis(100))
            .short_timeout(Duration::from_millis(50))
            .poll_interval(Duration::from_millis(10))
            .highlight_duration(Duration::from_millis(5))
            .build()
            .unwrap();
        BasePage::with_config(session, config)
    }

    #[tokio::test]
    async fn test_click_via_script_passes_element() {
        let session = FakeSession::new();
        let id = session.add(FakeElement::new("button").attr("id", "buy"));
        let page = quick(&session);
        page.click_via_script("id=buy").await.unwrap();

        let executed = session.scripts();
        assert_eq!(executed[0].script, scripts::CLICK);
        assert_eq!(executed[0].args, vec![ScriptArg::Element(id.clone())]);
        assert_eq!(session.clicks(), vec![id]);
    }

    #[tokio::test]
    async fn test_highlight_restores_style() {
        let session = FakeSession::new();
        let id = session.add(
            FakeElement::new("div")
                .attr("id", "card")
                .attr("style", "color: blue;"),
        );
        let page = quick(&session);
        page.highlight_via_script("id=card").await.unwrap();

        let executed = session.scripts();
        assert_eq!(executed.len(), 2);
        assert_eq!(
            executed[0].args[2],
            ScriptArg::from(scripts::HIGHLIGHT_STYLE)
        );
        assert_eq!(session.attribute_of(&id, "style").unwrap(), "color: blue;");
    }

    #[tokio::test]
    async fn test_remove_attribute() {
        let session = FakeSession::new();
        let id = session.add(
            FakeElement::new("input")
                .attr("id", "dob")
                .attr("readonly", "readonly"),
        );
        let page = quick(&session);
        page.remove_attribute_via_script("id=dob", "readonly")
            .await
            .unwrap();
        assert_eq!(session.attribute_of(&id, "readonly"), None);
    }

    #[tokio::test]
    async fn test_validation_message() {
        let session = FakeSession::new();
        session.add(FakeElement::new("input").attr("id", "email"));
        session.set_script_result(
            scripts::VALIDATION_MESSAGE,
            json!("Please fill out this field."),
        );
        let page = quick(&session);
        assert_eq!(
            page.read_validation_message_via_script("id=email").await.unwrap(),
            "Please fill out this field."
        );
    }

    #[tokio::test]
    async fn test_image_loaded() {
        let session = FakeSession::new();
        session.add(FakeElement::new("img").attr("id", "logo"));
        let page = quick(&session);
        assert!(!page.is_image_loaded_via_script("id=logo").await.unwrap());
        session.set_script_result(scripts::IMAGE_LOADED, json!(true));
        assert!(page.is_image_loaded_via_script("id=logo").await.unwrap());
    }

    #[tokio::test]
    async fn test_page_ready_without_jquery() {
        let session = FakeSession::new();
        session.fail_script(scripts::JQUERY_ACTIVE, "jQuery is not defined");
        session.set_script_result(scripts::DOCUMENT_READY_STATE, json!("complete"));
        let page = quick(&session);
        page.wait_for_page_ready().await.unwrap();
    }

    #[tokio::test]
    async fn test_page_ready_times_out_on_busy_jquery() {
        let session = FakeSession::new();
        session.set_script_result(scripts::JQUERY_ACTIVE, json!(2));
        session.set_script_result(scripts::DOCUMENT_READY_STATE, json!("complete"));
        let page = quick(&session);
        let err = page.wait_for_page_ready().await.unwrap_err();
        assert!(matches!(
            err,
            Error::WaitTimeout {
                condition: ConditionKind::AjaxIdle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_page_ready_waits_for_complete() {
        let session = FakeSession::new();
        session.set_script_result(scripts::JQUERY_ACTIVE, json!(0));
        session.set_script_result(scripts::DOCUMENT_READY_STATE, json!("interactive"));
        let page = quick(&session);
        let err = page.wait_for_page_ready().await.unwrap_err();
        assert!(matches!(
            err,
            Error::WaitTimeout {
                condition: ConditionKind::DocumentReady,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_scroll_to_bottom() {
        let session = FakeSession::new();
        let page = quick(&session);
        page.scroll_to_bottom_via_script().await.unwrap();
        assert_eq!(session.scripts()[0].script, scripts::SCROLL_TO_BOTTOM);
    }
}
