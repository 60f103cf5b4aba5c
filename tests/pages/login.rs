use page_engine::{BasePage, FakeSession, Result};

use super::PageObject;

pub struct LoginPage<'p> {
    pub page: &'p BasePage<'p, FakeSession>,
}

impl<'p> PageObject<'p> for LoginPage<'p> {
    fn page(&self) -> &'p BasePage<'p, FakeSession> {
        self.page
    }

    async fn is_loaded(&self) -> Result<bool> {
        self.page.is_displayed("id=login-form").await
    }
}

impl LoginPage<'_> {
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<()> {
        tracing::info!("Sign in as '{username}'.");
        self.page.send_keys("id=username", username).await?;
        self.page.send_keys("name=password", password).await?;
        self.page.click("css=button").await?;
        Ok(())
    }

    pub async fn error_message(&self) -> Result<String> {
        self.page.wait_for_visible("class=login-error").await?;
        self.page.element_text("class=login-error").await
    }
}
