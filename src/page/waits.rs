//! Explicit waits.

use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::{By, ToLocator};
use crate::session::Session;
use crate::wait::{ConditionKind, TimeoutTier, WaitSpec, poll_until};

use super::BasePage;

// ============================================================================
// BasePage - Waits
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Polls `condition` on `target` until it holds or `tier` elapses.
    ///
    /// Returns the elements that satisfied the condition: every match for
    /// `PresenceOfAll` / `VisibilityOfAll`, the first match for
    /// `VisibilityOfOne` / `Clickable`, and nothing for the invisibility
    /// conditions.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for `AlertPresent`, `AjaxIdle` and
    ///   `DocumentReady`, before `target` is parsed
    /// - Locator errors from parsing `target`
    /// - [`Error::WaitTimeout`] when the tier elapses
    /// - Session errors other than missing/stale elements, unchanged
    pub async fn wait_until(
        &self,
        condition: ConditionKind,
        target: impl ToLocator,
        tier: TimeoutTier,
    ) -> Result<Vec<ElementId>> {
        if !condition.is_element_condition() {
            return Err(not_an_element_condition(condition));
        }
        let by = target.to_locator()?;
        self.wait_for(WaitSpec::new(condition, tier), &by).await
    }

    /// Waits (long tier) for the first match to be displayed.
    pub async fn wait_for_visible(&self, target: impl ToLocator) -> Result<()> {
        self.wait_until(ConditionKind::VisibilityOfOne, target, TimeoutTier::Long)
            .await
            .map(drop)
    }

    /// Waits (long tier) for at least one match, all displayed.
    pub async fn wait_for_all_visible(&self, target: impl ToLocator) -> Result<()> {
        self.wait_until(ConditionKind::VisibilityOfAll, target, TimeoutTier::Long)
            .await
            .map(drop)
    }

    /// Waits (long tier) for the first match to be absent or hidden.
    pub async fn wait_for_invisible(&self, target: impl ToLocator) -> Result<()> {
        self.wait_until(ConditionKind::InvisibilityOfOne, target, TimeoutTier::Long)
            .await
            .map(drop)
    }

    /// Waits (long tier) until no match is displayed.
    pub async fn wait_for_all_invisible(&self, target: impl ToLocator) -> Result<()> {
        self.wait_until(ConditionKind::InvisibilityOfAll, target, TimeoutTier::Long)
            .await
            .map(drop)
    }

    /// Waits (long tier) for the first match to be displayed and enabled.
    pub async fn wait_for_clickable(&self, target: impl ToLocator) -> Result<()> {
        self.wait_until(ConditionKind::Clickable, target, TimeoutTier::Long)
            .await
            .map(drop)
    }

    /// Waits (long tier) for at least one match and returns all of them.
    pub async fn wait_for_presence_of_all(&self, target: impl ToLocator) -> Result<Vec<ElementId>> {
        self.wait_until(ConditionKind::PresenceOfAll, target, TimeoutTier::Long)
            .await
    }

    /// Fast-fail absence wait.
    ///
    /// Polls invisibility on the short tier with the session's implicit wait
    /// shortened to match, then restores the long tier whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::WaitTimeout`] (short tier) if the element stays displayed
    /// - [`Error::TimeoutOverrideActive`] when called inside another override
    pub async fn wait_for_undisplayed(&self, target: impl ToLocator) -> Result<()> {
        let by = target.to_locator()?;
        let spec = WaitSpec::new(ConditionKind::InvisibilityOfOne, TimeoutTier::Short);
        self.short_implicit_wait()
            .run(|| self.wait_for(spec, &by))
            .await
            .map(drop)
    }

    /// Waits (long tier) for a native dialog to open.
    pub async fn wait_for_alert_presence(&self) -> Result<()> {
        let spec = WaitSpec::new(ConditionKind::AlertPresent, TimeoutTier::Long);
        poll_until(
            spec,
            self.config.long_timeout(),
            self.config.poll_interval(),
            "alert",
            || async { self.session.alert_text().await.map(|_| Some(())) },
        )
        .await
    }

    pub(super) async fn wait_for(&self, spec: WaitSpec, by: &By) -> Result<Vec<ElementId>> {
        let target = by.to_string();
        poll_until(
            spec,
            self.config.timeout(spec.tier),
            self.config.poll_interval(),
            &target,
            || self.probe(spec.condition, by),
        )
        .await
    }

    /// Evaluates `condition` once.
    async fn probe(&self, condition: ConditionKind, by: &By) -> Result<Option<Vec<ElementId>>> {
        match condition {
            ConditionKind::PresenceOfAll => {
                let ids = self.session.find_elements(by).await?;
                Ok((!ids.is_empty()).then_some(ids))
            }
            ConditionKind::VisibilityOfOne => {
                let id = self.session.find_element(by).await?;
                let displayed = self.session.is_displayed(&id).await?;
                Ok(displayed.then(|| vec![id]))
            }
            ConditionKind::VisibilityOfAll => {
                let ids = self.session.find_elements(by).await?;
                if ids.is_empty() {
                    return Ok(None);
                }
                for id in &ids {
                    if !self.session.is_displayed(id).await? {
                        return Ok(None);
                    }
                }
                Ok(Some(ids))
            }
            ConditionKind::InvisibilityOfOne => match self.session.find_element(by).await {
                Ok(id) => self.hidden_or_gone(&id).await.map(|hidden| hidden.then(Vec::new)),
                Err(Error::NoSuchElement { .. }) => Ok(Some(Vec::new())),
                Err(e) => Err(e),
            },
            ConditionKind::InvisibilityOfAll => {
                for id in self.session.find_elements(by).await? {
                    if !self.hidden_or_gone(&id).await? {
                        return Ok(None);
                    }
                }
                Ok(Some(Vec::new()))
            }
            ConditionKind::Clickable => {
                let id = self.session.find_element(by).await?;
                let ready = self.session.is_displayed(&id).await?
                    && self.session.is_enabled(&id).await?;
                Ok(ready.then(|| vec![id]))
            }
            ConditionKind::AlertPresent
            | ConditionKind::AjaxIdle
            | ConditionKind::DocumentReady => Err(not_an_element_condition(condition)),
        }
    }

    /// Hidden and detached both count as not displayed.
    pub(super) async fn hidden_or_gone(&self, id: &ElementId) -> Result<bool> {
        match self.session.is_displayed(id).await {
            Ok(displayed) => Ok(!displayed),
            Err(Error::StaleElement { .. }) => {
                debug!(element_id = %id, "Element detached, treating as hidden");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

fn not_an_element_condition(condition: ConditionKind) -> Error {
    let instead = match condition {
        ConditionKind::AlertPresent => "wait_for_alert_presence",
        _ => "wait_for_page_ready",
    };
    Error::invalid_argument(format!(
        "'{condition}' does not take a locator; use {instead}"
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::fake::{FakeElement, FakeSession};
    use crate::page::PageConfig;

    fn quick(session: &FakeSession) -> BasePage<'_, FakeSession> {
        let config = PageConfig::builder()
            .long_timeout(Duration::from_millis(200))
            .short_timeout(Duration::from_millis(60))
            .poll_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        BasePage::with_config(session, config)
    }

    #[tokio::test]
    async fn test_visible_after_delay() {
        let session = FakeSession::new();
        session.add(
            FakeElement::new("div")
                .attr("id", "banner")
                .appears_after(Duration::from_millis(30)),
        );
        let page = quick(&session);
        page.wait_for_visible("id=banner").await.unwrap();
    }

    #[tokio::test]
    async fn test_visible_times_out_on_long_tier() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("id", "banner").hidden());
        let page = quick(&session);
        let err = page.wait_for_visible("id=banner").await.unwrap_err();
        assert!(matches!(
            err,
            Error::WaitTimeout {
                condition: ConditionKind::VisibilityOfOne,
                tier: TimeoutTier::Long,
                timeout_ms: 200,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_all_visible_needs_every_match() {
        let session = FakeSession::new();
        session.add(FakeElement::new("li").attr("class", "tile"));
        session.add(FakeElement::new("li").attr("class", "tile").hidden());
        let page = quick(&session);
        assert!(page.wait_for_all_visible("class=tile").await.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn test_invisible_accepts_absent_and_hidden() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("id", "spinner").hidden());
        let page = quick(&session);
        page.wait_for_invisible("id=missing").await.unwrap();
        page.wait_for_invisible("id=spinner").await.unwrap();
        page.wait_for_all_invisible("class=none").await.unwrap();
    }

    #[tokio::test]
    async fn test_invisible_waits_for_hide() {
        let session = FakeSession::new();
        session.add(
            FakeElement::new("div")
                .attr("id", "spinner")
                .hides_after(Duration::from_millis(30)),
        );
        let page = quick(&session);
        page.wait_for_invisible("id=spinner").await.unwrap();
    }

    #[tokio::test]
    async fn test_clickable_requires_enabled() {
        let session = FakeSession::new();
        let id = session.add(FakeElement::new("button").attr("id", "buy").disabled());
        let page = quick(&session);
        assert!(page.wait_for_clickable("id=buy").await.unwrap_err().is_timeout());
        session.set_enabled(&id, true);
        page.wait_for_clickable("id=buy").await.unwrap();
    }

    #[tokio::test]
    async fn test_presence_returns_all_in_order() {
        let session = FakeSession::new();
        let a = session.add(FakeElement::new("li").attr("class", "opt"));
        let b = session.add(FakeElement::new("li").attr("class", "opt").hidden());
        let page = quick(&session);
        assert_eq!(page.wait_for_presence_of_all("class=opt").await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_session_failure_is_not_retried() {
        let session = FakeSession::new();
        session.fail_lookups(By::id("flaky"));
        let page = quick(&session);
        assert!(matches!(
            page.wait_for_presence_of_all("id=flaky").await,
            Err(Error::Session { .. })
        ));
    }

    #[tokio::test]
    async fn test_alert_presence() {
        let session = FakeSession::new();
        session.open_alert_after("Saved", Duration::from_millis(30));
        let page = quick(&session);
        page.wait_for_alert_presence().await.unwrap();
    }

    #[tokio::test]
    async fn test_undisplayed_uses_short_tier_and_restores() {
        let session = FakeSession::new();
        session.add(FakeElement::new("div").attr("id", "toast"));
        let page = quick(&session);
        let err = page.wait_for_undisplayed("id=toast").await.unwrap_err();
        assert!(matches!(
            err,
            Error::WaitTimeout {
                tier: TimeoutTier::Short,
                ..
            }
        ));
        assert_eq!(
            session.implicit_wait_history(),
            vec![Duration::from_millis(60), Duration::from_millis(200)]
        );
    }

    #[tokio::test]
    async fn test_page_condition_rejected() {
        let session = FakeSession::new();
        let page = quick(&session);
        assert!(matches!(
            page.wait_until(ConditionKind::DocumentReady, "id=x", TimeoutTier::Long)
                .await,
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_alert_condition_rejected_before_parsing() {
        let session = FakeSession::new();
        session.open_alert("Saved");
        let page = quick(&session);
        let err = page
            .wait_until(ConditionKind::AlertPresent, "foo", TimeoutTier::Long)
            .await
            .unwrap_err();
        match err {
            Error::InvalidArgument { message } => {
                assert!(message.contains("wait_for_alert_presence"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unbounded_long_tier_is_accepted() {
        let session = FakeSession::new();
        session.add(
            FakeElement::new("div")
                .attr("id", "banner")
                .appears_after(Duration::from_millis(20)),
        );
        let config = PageConfig::builder()
            .long_timeout(Duration::MAX)
            .poll_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        let page = BasePage::with_config(&session, config);
        page.wait_for_visible("id=banner").await.unwrap();
        page.wait_for_invisible("id=missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_invisible_treats_detached_as_hidden() {
        let session = FakeSession::new();
        let id = session.add(FakeElement::new("div").attr("id", "spinner"));
        session.detach_on_display_check(&id);
        let page = quick(&session);
        page.wait_for_invisible("id=spinner").await.unwrap();
    }

    #[tokio::test]
    async fn test_all_invisible_treats_detached_as_hidden() {
        let session = FakeSession::new();
        let first = session.add(FakeElement::new("li").attr("class", "toast").hidden());
        let second = session.add(FakeElement::new("li").attr("class", "toast"));
        session.detach_on_display_check(&second);
        let page = quick(&session);
        page.wait_for_all_invisible("class=toast").await.unwrap();
        assert!(!session.is_displayed(&first).await.unwrap());
    }

    #[tokio::test]
    async fn test_undisplayed_treats_detached_as_hidden() {
        let session = FakeSession::new();
        let id = session.add(FakeElement::new("div").attr("id", "toast"));
        session.detach_on_display_check(&id);
        let page = quick(&session);
        page.wait_for_undisplayed("id=toast").await.unwrap();
        assert_eq!(session.implicit_wait(), page.config().long_timeout());
    }
}
