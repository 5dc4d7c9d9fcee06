use super::{Interactions, RoutedPage};
use crate::browser::{Locator, Session};
use crate::core::TextMatch;
use crate::errors::Result;
use async_trait::async_trait;

pub struct LoginPage {
    ui: Interactions,
    username_textfield: Locator,
    password_textfield: Locator,
    login_button: Locator,
    error_message: Locator,
    login_container: Locator,
}

impl LoginPage {
    /// The login form lives at the storefront root.
    pub const PATH: &'static str = "";

    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "LoginPage"),
            username_textfield: session.locator("[data-test='username']"),
            password_textfield: session.locator("[data-test='password']"),
            login_button: session.get_by_role("button", "Login"),
            error_message: session.locator("[data-test='error']"),
            login_container: session
                .locator("[data-test='login-container'] div")
                .filter_text(TextMatch::Contains("Login".to_string()))
                .first(),
        }
    }

    pub async fn navigate_to_login_page(&self) -> Result<()> {
        let url = self.canonical_url()?;
        self.ui.navigate(&url).await
    }

    pub async fn fill_username(&self, username: &str) -> Result<()> {
        self.ui
            .fill(&self.username_textfield, username, Some("Username Textfield"))
            .await
    }

    /// Typed key by key so the form's per-keystroke validation runs.
    pub async fn type_password(&self, password: &str) -> Result<()> {
        let delay = self.ui.session().config().password_typing_delay();
        self.ui
            .type_with_delay(
                &self.password_textfield,
                password,
                delay,
                Some("Password Textfield"),
                true,
            )
            .await
    }

    pub async fn click_login_button(&self) -> Result<()> {
        self.ui.click(&self.login_button, Some("Login Button")).await
    }

    pub async fn validate_login_error_message(&self, error_message_text: &str) -> Result<()> {
        self.ui
            .verify_contains_text(
                &self.error_message,
                error_message_text,
                Some("Login Error Message"),
            )
            .await
    }

    pub async fn validate_login_container_is_visible(&self) -> Result<()> {
        self.ui
            .verify_visible(&self.login_container, Some("Login Container"))
            .await
    }
}

#[async_trait]
impl RoutedPage for LoginPage {
    fn canonical_url(&self) -> Result<String> {
        self.ui.session().url_for(Self::PATH)
    }

    async fn validate_page_url(&self) -> Result<()> {
        self.ui.verify_url(&self.canonical_url()?).await
    }
}
