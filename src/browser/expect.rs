//! Bounded-retry assertions.
//!
//! Every assertion re-resolves its target until the condition holds or the
//! session's assertion timeout elapses, then fails with
//! [`E2eError::AssertionTimeout`] describing the last observed value.

use super::session::{is_transient, Locator, Session};
use crate::core::selector::normalize_whitespace;
use crate::core::ElementProbe;
use crate::errors::{E2eError, Result};
use std::time::{Duration, Instant};

pub fn expect(locator: &Locator) -> LocatorAssertions<'_> {
    let config = locator.session().config();
    LocatorAssertions {
        locator,
        timeout: config.assertion_timeout(),
        poll_interval: config.poll_interval(),
    }
}

pub fn expect_page(session: &Session) -> PageAssertions<'_> {
    PageAssertions {
        session,
        timeout: session.config().assertion_timeout(),
        poll_interval: session.config().poll_interval(),
    }
}

pub struct LocatorAssertions<'a> {
    locator: &'a Locator,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a> LocatorAssertions<'a> {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Case-sensitive substring match on the element's normalized text.
    pub async fn to_contain_text(&self, expected: &str) -> Result<()> {
        let needle = normalize_whitespace(expected);
        self.poll(
            format!("to contain text '{}'", expected),
            |probe| {
                probe.is_unique()
                    && probe
                        .text
                        .as_deref()
                        .map(|text| normalize_whitespace(text).contains(&needle))
                        .unwrap_or(false)
            },
            |probe| describe(probe, |p| format!("'{}'", p.text.as_deref().unwrap_or_default())),
        )
        .await
    }

    pub async fn to_be_visible(&self) -> Result<()> {
        self.poll(
            "to be visible".to_string(),
            |probe| probe.is_unique() && probe.visible,
            |probe| describe(probe, |_| "hidden".to_string()),
        )
        .await
    }

    async fn poll<C, D>(&self, expectation: String, check: C, actual: D) -> Result<()>
    where
        C: Fn(&ElementProbe) -> bool,
        D: Fn(&ElementProbe) -> String,
    {
        let started = Instant::now();

        loop {
            let last_actual = match self.locator.probe().await {
                Ok(probe) if check(&probe) => return Ok(()),
                Ok(probe) => actual(&probe),
                Err(err) if is_transient(&err) => format!("<{}>", err),
                Err(err) => return Err(err),
            };

            if started.elapsed() >= self.timeout {
                return Err(E2eError::AssertionTimeout {
                    subject: self.locator.to_string(),
                    expectation,
                    actual: last_actual,
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn describe(probe: &ElementProbe, single: impl Fn(&ElementProbe) -> String) -> String {
    match probe.count {
        0 => "<element not found>".to_string(),
        1 => single(probe),
        n => format!("<strict mode violation: {} elements>", n),
    }
}

pub struct PageAssertions<'a> {
    session: &'a Session,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a> PageAssertions<'a> {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exact string equality with the active URL.
    pub async fn to_have_url(&self, expected: &str) -> Result<()> {
        let started = Instant::now();

        loop {
            let last_actual = match self.session.current_url().await {
                Ok(url) if url == expected => return Ok(()),
                Ok(url) => format!("'{}'", url),
                Err(err) if is_transient(&err) => format!("<{}>", err),
                Err(err) => return Err(err),
            };

            if started.elapsed() >= self.timeout {
                return Err(E2eError::AssertionTimeout {
                    subject: "Page".to_string(),
                    expectation: format!("to have URL '{}'", expected),
                    actual: last_actual,
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
