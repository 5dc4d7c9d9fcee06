use super::{Interactions, RoutedPage, TitledPage, PAGE_TITLE};
use crate::browser::{Locator, Session};
use crate::errors::Result;
use async_trait::async_trait;

/// First checkout step: buyer name and postal code.
pub struct CheckoutInfoPage {
    ui: Interactions,
    page_title: Locator,
    first_name_field: Locator,
    last_name_field: Locator,
    postal_code_field: Locator,
    continue_button: Locator,
    error_message: Locator,
}

impl CheckoutInfoPage {
    pub const PATH: &'static str = "checkout-step-one.html";

    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "CheckoutInfoPage"),
            page_title: session.locator(PAGE_TITLE),
            first_name_field: session.locator("[data-test='firstName']"),
            last_name_field: session.locator("[data-test='lastName']"),
            postal_code_field: session.locator("[data-test='postalCode']"),
            continue_button: session.locator("[data-test='continue']"),
            error_message: session.locator("[data-test='error']"),
        }
    }

    pub async fn fill_first_name(&self, first_name: &str) -> Result<()> {
        self.ui
            .fill(&self.first_name_field, first_name, Some("First Name Field"))
            .await
    }

    pub async fn fill_last_name(&self, last_name: &str) -> Result<()> {
        self.ui
            .fill(&self.last_name_field, last_name, Some("Last Name Field"))
            .await
    }

    pub async fn fill_postal_code(&self, postal_code: &str) -> Result<()> {
        self.ui
            .fill(&self.postal_code_field, postal_code, Some("Postal Code Field"))
            .await
    }

    pub async fn click_continue_button(&self) -> Result<()> {
        self.ui
            .click(&self.continue_button, Some("Continue Button"))
            .await
    }

    /// Form validation banner shown when a required field is left empty.
    pub async fn validate_error_message(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.error_message, expected, Some("Checkout Error Message"))
            .await
    }
}

#[async_trait]
impl TitledPage for CheckoutInfoPage {
    async fn validate_page_title_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.page_title, expected, Some("Page Title"))
            .await
    }
}

#[async_trait]
impl RoutedPage for CheckoutInfoPage {
    fn canonical_url(&self) -> Result<String> {
        self.ui.session().url_for(Self::PATH)
    }

    async fn validate_page_url(&self) -> Result<()> {
        self.ui.verify_url(&self.canonical_url()?).await
    }
}
