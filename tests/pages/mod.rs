use page_engine::{BasePage, FakeSession, Result};

pub mod checkout;
pub mod login;

/// Shared behaviour for page objects built over one engine.
pub(crate) trait PageObject<'p> {
    fn page(&self) -> &'p BasePage<'p, FakeSession>;

    async fn is_loaded(&self) -> Result<bool>;

    async fn dismiss_cookie_banner(&self) -> Result<()> {
        tracing::info!("Dismiss cookie banner.");
        let page = self.page();
        if page.is_displayed("id=cookie-accept").await? {
            page.click("id=cookie-accept").await?;
            page.wait_for_invisible("id=cookie-banner").await?;
        }
        Ok(())
    }
}
