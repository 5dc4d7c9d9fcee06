use super::{Interactions, RoutedPage, TitledPage, PAGE_TITLE};
use crate::browser::{Locator, Session};
use crate::errors::Result;
use async_trait::async_trait;

pub struct CheckoutCompletePage {
    ui: Interactions,
    page_title: Locator,
    complete_header: Locator,
    complete_text: Locator,
    back_to_products_button: Locator,
}

impl CheckoutCompletePage {
    pub const PATH: &'static str = "checkout-complete.html";

    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "CheckoutCompletePage"),
            page_title: session.locator(PAGE_TITLE),
            complete_header: session.locator("[data-test='complete-header']"),
            complete_text: session.locator("[data-test='complete-text']"),
            back_to_products_button: session.locator("[data-test='back-to-products']"),
        }
    }

    pub async fn validate_complete_header_is_visible(&self) -> Result<()> {
        self.ui
            .verify_visible(&self.complete_header, Some("Complete Header"))
            .await
    }

    pub async fn validate_complete_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.complete_text, expected, Some("Complete Text"))
            .await
    }

    pub async fn validate_back_to_products_button_is_visible(&self) -> Result<()> {
        self.ui
            .verify_visible(&self.back_to_products_button, Some("Back Home Button"))
            .await
    }

    pub async fn click_back_to_products_button(&self) -> Result<()> {
        self.ui
            .click(&self.back_to_products_button, Some("All Items Button"))
            .await
    }
}

#[async_trait]
impl TitledPage for CheckoutCompletePage {
    async fn validate_page_title_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.page_title, expected, Some("Page Title"))
            .await
    }
}

#[async_trait]
impl RoutedPage for CheckoutCompletePage {
    fn canonical_url(&self) -> Result<String> {
        self.ui.session().url_for(Self::PATH)
    }

    async fn validate_page_url(&self) -> Result<()> {
        self.ui.verify_url(&self.canonical_url()?).await
    }
}
