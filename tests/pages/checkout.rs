use page_engine::locator::dynamic;
use page_engine::{BasePage, FakeSession, Result};

use super::PageObject;

pub struct CheckoutPage<'p> {
    pub page: &'p BasePage<'p, FakeSession>,
}

impl<'p> PageObject<'p> for CheckoutPage<'p> {
    fn page(&self) -> &'p BasePage<'p, FakeSession> {
        self.page
    }

    async fn is_loaded(&self) -> Result<bool> {
        Ok(self.page.element_count("class=cart-line").await? > 0)
    }
}

impl CheckoutPage<'_> {
    pub async fn quantity_of(&self, sku: &str) -> Result<String> {
        let cell = dynamic("xpath=//tr[@data-sku='%s']/td[@class='qty']", [sku]);
        self.page.element_text(cell).await
    }

    pub async fn choose_shipping(&self, method: &str) -> Result<()> {
        tracing::info!("Choose shipping '{method}'.");
        self.page.select_by_visible_text("id=shipping", method).await
    }

    pub async fn accept_terms(&self) -> Result<()> {
        self.page.check("id=terms").await
    }
}
