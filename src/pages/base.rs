//! The interaction layer every page object is built from.
//!
//! Each operation logs what it is about to do under the owning page's name.
//! `verify_*` operations log failures at error level and hand back the
//! original error value; the other operations do not intercept failures.

use crate::browser::{expect, expect_page, Locator, Session};
use crate::errors::Result;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct Interactions {
    session: Session,
    page: &'static str,
}

impl Interactions {
    pub fn new(session: &Session, page: &'static str) -> Self {
        Self {
            session: session.clone(),
            page,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page_name(&self) -> &'static str {
        self.page
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        info!(page = self.page, "Navigating to: {}", url);
        self.session.goto(url).await
    }

    pub async fn click(&self, locator: &Locator, name: Option<&str>) -> Result<()> {
        let name = display_name(locator, name);
        info!(page = self.page, "Clicking: '{}' element", name);
        locator.click().await
    }

    /// Replaces the element's current value.
    pub async fn fill(&self, locator: &Locator, text: &str, name: Option<&str>) -> Result<()> {
        let name = display_name(locator, name);
        info!(page = self.page, "Filling '{}' into: '{}' element", text, name);
        locator.fill(text).await
    }

    /// Sends `text` one key at a time, `delay` apart. With `secret` set the
    /// log line carries a same-length mask instead of the text.
    pub async fn type_with_delay(
        &self,
        locator: &Locator,
        text: &str,
        delay: Duration,
        name: Option<&str>,
        secret: bool,
    ) -> Result<()> {
        let name = display_name(locator, name);
        let shown = if secret {
            mask_secret(text)
        } else {
            text.to_string()
        };
        info!(page = self.page, "Typing '{}' into: '{}' element", shown, name);
        locator.press_sequentially(text, delay).await
    }

    pub async fn verify_contains_text(
        &self,
        locator: &Locator,
        expected: &str,
        name: Option<&str>,
    ) -> Result<()> {
        let name = display_name(locator, name);
        info!(
            page = self.page,
            "Verifying '{}' element contains text: '{}'", name, expected
        );
        expect(locator)
            .to_contain_text(expected)
            .await
            .inspect_err(|e| {
                error!(
                    page = self.page,
                    "Text verification failed for '{}'. Error: {}", name, e
                )
            })
    }

    pub async fn verify_visible(&self, locator: &Locator, name: Option<&str>) -> Result<()> {
        let name = display_name(locator, name);
        info!(page = self.page, "Verifying '{}' element is visible", name);
        expect(locator).to_be_visible().await.inspect_err(|e| {
            error!(
                page = self.page,
                "Visibility verification failed for '{}'. Error: {}", name, e
            )
        })
    }

    pub async fn verify_url(&self, url: &str) -> Result<()> {
        info!(page = self.page, "Verifying page URL is: {}", url);
        expect_page(&self.session)
            .to_have_url(url)
            .await
            .inspect_err(|e| {
                error!(
                    page = self.page,
                    "URL verification failed! Expected '{}'. Error: {}", url, e
                )
            })
    }
}

/// The override when one is given, otherwise the locator's canonical form.
/// An empty override counts as absent.
pub fn display_name(locator: &Locator, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => locator.to_string(),
    }
}

pub fn mask_secret(text: &str) -> String {
    "*".repeat(text.chars().count())
}
