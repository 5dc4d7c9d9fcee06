use crate::core::{Driver, ElementProbe, Selector, SessionConfig, TextMatch};
use crate::errors::{E2eError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// A single test's handle on the browser. Cloning shares the same driver;
/// a session is never shared between tests.
#[derive(Clone)]
pub struct Session {
    driver: Arc<dyn Driver>,
    config: Arc<SessionConfig>,
    base_url: Url,
    session_id: String,
}

impl Session {
    pub fn new(driver: Arc<dyn Driver>, config: SessionConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        Ok(Self {
            driver,
            config: Arc::new(config),
            base_url,
            session_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a page path against the configured storefront base URL.
    pub fn url_for(&self, path: &str) -> Result<String> {
        Ok(self.base_url.join(path)?.to_string())
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.driver.current_url().await
    }

    pub fn locator(&self, css: &str) -> Locator {
        Locator::new(self.clone(), Selector::css(css))
    }

    pub fn get_by_role(&self, role: &str, name: &str) -> Locator {
        Locator::new(self.clone(), Selector::role(role, name))
    }

    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.driver.screenshot().await
    }

    pub async fn close(&self) -> Result<()> {
        self.driver.close().await
    }

    pub(crate) fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Lazily-resolved element reference. The selector is fixed at
/// construction; every operation re-resolves it against the live page.
#[derive(Debug, Clone)]
pub struct Locator {
    session: Session,
    selector: Selector,
}

impl Locator {
    pub fn new(session: Session, selector: Selector) -> Self {
        Self { session, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Narrow to matches that contain an element matching `other`.
    pub fn filter_has(&self, other: &Locator) -> Locator {
        self.derive(self.selector.clone().has(other.selector.clone()))
    }

    pub fn filter_text(&self, text: TextMatch) -> Locator {
        self.derive(self.selector.clone().has_text(text))
    }

    pub fn get_by_role(&self, role: &str, name: &str) -> Locator {
        self.derive(Selector::role(role, name).within(self.selector.clone()))
    }

    pub fn first(&self) -> Locator {
        self.derive(self.selector.clone().nth(0))
    }

    fn derive(&self, selector: Selector) -> Locator {
        Locator::new(self.session.clone(), selector)
    }

    pub async fn probe(&self) -> Result<ElementProbe> {
        self.session.driver().probe(&self.selector).await
    }

    pub async fn click(&self) -> Result<()> {
        self.wait_for_actionable(false).await?;
        self.session.driver().click(&self.selector).await
    }

    pub async fn fill(&self, text: &str) -> Result<()> {
        self.wait_for_actionable(true).await?;
        self.session.driver().set_value(&self.selector, text).await
    }

    pub async fn press_sequentially(&self, text: &str, delay: Duration) -> Result<()> {
        self.wait_for_actionable(true).await?;

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            self.session.driver().type_char(&self.selector, ch).await?;
            if !delay.is_zero() && chars.peek().is_some() {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(())
    }

    async fn wait_for_actionable(&self, needs_editable: bool) -> Result<()> {
        let config = self.session.config();
        let timeout = config.action_timeout();
        let started = Instant::now();

        loop {
            let blocker = match self.probe().await {
                Ok(probe) => match self.actionability_error(&probe, needs_editable) {
                    None => return Ok(()),
                    Some(err) => err,
                },
                Err(err) if is_transient(&err) => err,
                Err(err) => return Err(err),
            };

            if started.elapsed() >= timeout {
                return Err(blocker);
            }
            debug!(locator = %self, reason = %blocker, "waiting for element to become actionable");
            tokio::time::sleep(config.poll_interval()).await;
        }
    }

    fn actionability_error(&self, probe: &ElementProbe, needs_editable: bool) -> Option<E2eError> {
        let selector = self.selector.to_string();
        let reason = if probe.count == 0 {
            return Some(E2eError::ElementNotFound(selector));
        } else if probe.count > 1 {
            return Some(E2eError::StrictModeViolation {
                selector,
                count: probe.count,
            });
        } else if !probe.visible {
            "element is not visible"
        } else if !probe.enabled {
            "element is disabled"
        } else if needs_editable && !probe.editable {
            "element is not editable"
        } else {
            return None;
        };

        Some(E2eError::NotActionable {
            selector,
            reason: reason.to_string(),
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator@{}", self.selector)
    }
}

/// Failures a page in mid-navigation produces while its document is swapped.
pub(crate) fn is_transient(err: &E2eError) -> bool {
    matches!(err, E2eError::JavaScriptFailed(_))
}
