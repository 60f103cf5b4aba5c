//! Session-level call-through: URLs, history, cookies, alerts, windows, frames.

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::WindowHandle;
use crate::locator::ToLocator;
use crate::session::{Cookie, Session};

use super::BasePage;

// ============================================================================
// BasePage - Navigation
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Loads `url` in the current window.
    ///
    /// # Errors
    ///
    /// [`Error::Url`] if `url` does not parse.
    pub async fn open_page_url(&self, url: &str) -> Result<()> {
        let url = Url::parse(url)?;
        debug!(url = %url, "Opening page");
        self.session.navigate(&url).await
    }

    /// Current document title.
    pub async fn page_title(&self) -> Result<String> {
        self.session.title().await
    }

    /// Current document URL.
    pub async fn page_url(&self) -> Result<String> {
        self.session.current_url().await
    }

    /// Serialized current document.
    pub async fn page_source(&self) -> Result<String> {
        self.session.page_source().await
    }

    /// Goes back one history entry.
    pub async fn back_to_page(&self) -> Result<()> {
        debug!("Navigating back");
        self.session.back().await
    }

    /// Goes forward one history entry.
    pub async fn forward_to_page(&self) -> Result<()> {
        debug!("Navigating forward");
        self.session.forward().await
    }

    /// Reloads the current document.
    pub async fn refresh_current_page(&self) -> Result<()> {
        debug!("Reloading page");
        self.session.refresh().await
    }
}

// ============================================================================
// BasePage - Cookies
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// All cookies visible to the current document.
    pub async fn all_cookies(&self) -> Result<Vec<Cookie>> {
        self.session.cookies().await
    }

    /// Adds every cookie in `cookies`.
    pub async fn set_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        debug!(count = cookies.len(), "Setting cookies");
        for cookie in cookies {
            self.session.add_cookie(cookie).await?;
        }
        Ok(())
    }
}

// ============================================================================
// BasePage - Alerts
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Waits for a dialog, then accepts it.
    pub async fn accept_alert(&self) -> Result<()> {
        self.wait_for_alert_presence().await?;
        debug!("Accepting alert");
        self.session.accept_alert().await
    }

    /// Waits for a dialog, then dismisses it.
    pub async fn cancel_alert(&self) -> Result<()> {
        self.wait_for_alert_presence().await?;
        debug!("Dismissing alert");
        self.session.dismiss_alert().await
    }

    /// Waits for a dialog and returns its message.
    pub async fn alert_text(&self) -> Result<String> {
        self.wait_for_alert_presence().await?;
        self.session.alert_text().await
    }

    /// Waits for a prompt and types `text` into it.
    pub async fn send_keys_to_alert(&self, text: &str) -> Result<()> {
        self.wait_for_alert_presence().await?;
        debug!(len = text.len(), "Typing into alert");
        self.session.send_alert_text(text).await
    }
}

// ============================================================================
// BasePage - Windows & Frames
// ============================================================================

impl<S: Session + ?Sized> BasePage<'_, S> {
    /// Handle of the current window.
    pub async fn window_handle(&self) -> Result<WindowHandle> {
        self.session.window_handle().await
    }

    /// Switches to the first window that is not `parent`.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchWindow`] if `parent` is the only window.
    pub async fn switch_to_window_by_id(&self, parent: &WindowHandle) -> Result<()> {
        let handles = self.session.window_handles().await?;
        let other = handles
            .iter()
            .find(|handle| *handle != parent)
            .ok_or_else(|| Error::NoSuchWindow {
                handle: format!("any window other than {parent}"),
            })?;
        debug!(window = %other, "Switching window");
        self.session.switch_to_window(other).await
    }

    /// Switches to the first window whose title equals `title`.
    ///
    /// Windows are visited in handle order; the session is left on the last
    /// window visited when none matches.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchWindow`] naming `title` if no window has it.
    pub async fn switch_to_window_by_title(&self, title: &str) -> Result<()> {
        for handle in self.session.window_handles().await? {
            self.session.switch_to_window(&handle).await?;
            if self.session.title().await? == title {
                debug!(window = %handle, title, "Switched window by title");
                return Ok(());
            }
        }
        Err(Error::NoSuchWindow {
            handle: format!("title '{title}'"),
        })
    }

    /// Closes every window except `parent` and switches back to it.
    pub async fn close_all_windows_except(&self, parent: &WindowHandle) -> Result<()> {
        for handle in self.session.window_handles().await? {
            if &handle == parent {
                continue;
            }
            debug!(window = %handle, "Closing window");
            self.session.switch_to_window(&handle).await?;
            self.session.close_window().await?;
        }
        self.session.switch_to_window(parent).await
    }

    /// Switches into the frame owned by the first match.
    pub async fn switch_to_frame(&self, target: impl ToLocator) -> Result<()> {
        let by = target.to_locator()?;
        let frame = self.element(&by).await?;
        debug!(element_id = %frame, "Switching to frame");
        self.session.switch_to_frame(&frame).await
    }

    /// Switches back to the top-level document.
    pub async fn switch_to_default_content(&self) -> Result<()> {
        debug!("Switching to default content");
        self.session.switch_to_default_content().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::fake::{AlertEvent, FakeElement, FakeSession};
    use crate::page::PageConfig;

    fn quick(session: &FakeSession) -> BasePage<'_, FakeSession> {
        let config = PageConfig::builder()
            .long_timeout(Duration::from_millis(100))
            .short_timeout(Duration::from_millis(50))
            .poll_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        BasePage::with_config(session, config)
    }

    #[tokio::test]
    async fn test_open_and_history() {
        let session = FakeSession::new();
        let page = quick(&session);
        page.open_page_url("https://shop.test/").await.unwrap();
        page.open_page_url("https://shop.test/cart").await.unwrap();
        page.back_to_page().await.unwrap();
        assert_eq!(page.page_url().await.unwrap(), "https://shop.test/");
        page.forward_to_page().await.unwrap();
        page.refresh_current_page().await.unwrap();
        assert_eq!(page.page_url().await.unwrap(), "https://shop.test/cart");
    }

    #[tokio::test]
    async fn test_open_rejects_bad_url() {
        let session = FakeSession::new();
        let page = quick(&session);
        assert!(matches!(
            page.open_page_url("not a url").await,
            Err(Error::Url(_))
        ));
    }

    #[tokio::test]
    async fn test_title_and_source() {
        let session = FakeSession::new();
        session.set_title("Checkout");
        session.set_page_source("<html></html>");
        let page = quick(&session);
        assert_eq!(page.page_title().await.unwrap(), "Checkout");
        assert_eq!(page.page_source().await.unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_cookies_roundtrip_through_session() {
        let session = FakeSession::new();
        let page = quick(&session);
        let cookies = vec![Cookie::new("sid", "1"), Cookie::new("lang", "en")];
        page.set_cookies(&cookies).await.unwrap();
        page.set_cookies(&[Cookie::new("sid", "2")]).await.unwrap();
        let stored = page.all_cookies().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().any(|c| c.name == "sid" && c.value == "2"));
    }

    #[tokio::test]
    async fn test_alert_flow() {
        let session = FakeSession::new();
        let page = quick(&session);
        session.open_alert_after("Name?", Duration::from_millis(20));
        assert_eq!(page.alert_text().await.unwrap(), "Name?");
        page.send_keys_to_alert("Ada").await.unwrap();
        page.accept_alert().await.unwrap();

        session.open_alert("Leave page?");
        page.cancel_alert().await.unwrap();

        assert_eq!(
            session.alert_log(),
            vec![
                AlertEvent::Typed("Ada".into()),
                AlertEvent::Accepted("Name?".into()),
                AlertEvent::Dismissed("Leave page?".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_accept_without_alert_times_out() {
        let session = FakeSession::new();
        let page = quick(&session);
        assert!(page.accept_alert().await.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn test_switch_by_id() {
        let session = FakeSession::new();
        let page = quick(&session);
        let parent = page.window_handle().await.unwrap();
        assert!(matches!(
            page.switch_to_window_by_id(&parent).await,
            Err(Error::NoSuchWindow { .. })
        ));
        let popup = session.add_window("Popup", "https://shop.test/help");
        page.switch_to_window_by_id(&parent).await.unwrap();
        assert_eq!(page.window_handle().await.unwrap(), popup);
    }

    #[tokio::test]
    async fn test_switch_by_title() {
        let session = FakeSession::new();
        session.add_window("Terms", "https://shop.test/terms");
        let privacy = session.add_window("Privacy", "https://shop.test/privacy");
        let page = quick(&session);
        page.switch_to_window_by_title("Privacy").await.unwrap();
        assert_eq!(page.window_handle().await.unwrap(), privacy);
        assert!(matches!(
            page.switch_to_window_by_title("Refunds").await,
            Err(Error::NoSuchWindow { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_all_except_parent() {
        let session = FakeSession::new();
        let page = quick(&session);
        let parent = page.window_handle().await.unwrap();
        session.add_window("A", "https://a.test/");
        session.add_window("B", "https://b.test/");
        page.close_all_windows_except(&parent).await.unwrap();
        assert_eq!(session.window_count(), 1);
        assert_eq!(page.window_handle().await.unwrap(), parent);
    }

    #[tokio::test]
    async fn test_frames() {
        let session = FakeSession::new();
        let frame = session.add(FakeElement::new("iframe").attr("id", "payment"));
        let page = quick(&session);
        page.switch_to_frame("id=payment").await.unwrap();
        assert_eq!(session.current_frame(), Some(frame));
        page.switch_to_default_content().await.unwrap();
        assert_eq!(session.current_frame(), None);
    }
}
