use super::{Interactions, RoutedPage, TitledPage, PAGE_TITLE};
use crate::browser::{Locator, Session};
use crate::errors::Result;
use async_trait::async_trait;

pub struct CheckoutOverviewPage {
    ui: Interactions,
    page_title: Locator,
    payment_info_label: Locator,
    shipping_info_label: Locator,
    total_info_label: Locator,
    finish_button: Locator,
}

impl CheckoutOverviewPage {
    pub const PATH: &'static str = "checkout-step-two.html";

    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "CheckoutOverviewPage"),
            page_title: session.locator(PAGE_TITLE),
            payment_info_label: session.locator("[data-test='payment-info-label']"),
            shipping_info_label: session.locator("[data-test='shipping-info-label']"),
            total_info_label: session.locator("[data-test='total-info-label']"),
            finish_button: session.locator("[data-test='finish']"),
        }
    }

    pub async fn validate_payment_info_label_is_visible(&self) -> Result<()> {
        self.ui
            .verify_visible(&self.payment_info_label, Some("Payment Info Label"))
            .await
    }

    pub async fn validate_shipping_info_label_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(
                &self.shipping_info_label,
                expected,
                Some("Shipping Info Label"),
            )
            .await
    }

    pub async fn validate_total_info_label_is_visible(&self) -> Result<()> {
        self.ui
            .verify_visible(&self.total_info_label, Some("Total Info Label"))
            .await
    }

    pub async fn click_finish_button(&self) -> Result<()> {
        self.ui.click(&self.finish_button, Some("Finish Button")).await
    }
}

#[async_trait]
impl TitledPage for CheckoutOverviewPage {
    async fn validate_page_title_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.page_title, expected, Some("Page Title"))
            .await
    }
}

#[async_trait]
impl RoutedPage for CheckoutOverviewPage {
    fn canonical_url(&self) -> Result<String> {
        self.ui.session().url_for(Self::PATH)
    }

    async fn validate_page_url(&self) -> Result<()> {
        self.ui.verify_url(&self.canonical_url()?).await
    }
}
