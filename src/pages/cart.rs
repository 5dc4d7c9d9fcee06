use super::{Interactions, RoutedPage, TitledPage, PAGE_TITLE};
use crate::browser::{Locator, Session};
use crate::errors::Result;
use async_trait::async_trait;

pub struct CartPage {
    ui: Interactions,
    page_title: Locator,
    checkout_button: Locator,
}

impl CartPage {
    pub const PATH: &'static str = "cart.html";

    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "CartPage"),
            page_title: session.locator(PAGE_TITLE),
            checkout_button: session.locator("[data-test='checkout']"),
        }
    }

    pub async fn click_checkout_button(&self) -> Result<()> {
        self.ui
            .click(&self.checkout_button, Some("Checkout Button"))
            .await
    }
}

#[async_trait]
impl TitledPage for CartPage {
    async fn validate_page_title_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.page_title, expected, Some("Page Title"))
            .await
    }
}

#[async_trait]
impl RoutedPage for CartPage {
    fn canonical_url(&self) -> Result<String> {
        self.ui.session().url_for(Self::PATH)
    }

    async fn validate_page_url(&self) -> Result<()> {
        self.ui.verify_url(&self.canonical_url()?).await
    }
}
