use crate::core::{BrowserConfig, Driver, ElementProbe, Selector, SessionConfig};
use crate::errors::{E2eError, Result};
use crate::utils::javascript::{self, CLICK_BODY, FOCUS_BODY, PROBE_BODY};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Chrome implementation of [`Driver`]. One instance owns one browser
/// process and a single tab.
pub struct ChromeDriver {
    browser: Browser,
    tab: Arc<Tab>,
}

#[derive(Debug, Deserialize)]
struct ScriptOutcome {
    count: usize,
}

impl ChromeDriver {
    pub fn launch(config: &BrowserConfig, session: &SessionConfig) -> Result<Self> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        if config.disable_images {
            args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        }

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .idle_browser_timeout(Duration::from_millis(config.idle_timeout_ms))
            .build()
            .map_err(|e| E2eError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| E2eError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| E2eError::LaunchFailed(e.to_string()))?;
        tab.set_default_timeout(session.navigation_timeout());

        info!(
            headless = config.headless,
            width = config.viewport.width,
            height = config.viewport.height,
            "Chrome session started"
        );

        Ok(Self { browser, tab })
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| E2eError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    fn run_element_script<T: DeserializeOwned>(&self, selector: &Selector, body: &str) -> Result<T> {
        let script = javascript::element_script(selector, body)?;

        match self.evaluate(&script)? {
            Value::String(json) => Ok(serde_json::from_str(&json)?),
            other => Err(E2eError::JavaScriptFailed(format!(
                "unexpected result for {}: {}",
                selector, other
            ))),
        }
    }

    fn run_strict(&self, selector: &Selector, body: &str) -> Result<()> {
        let outcome: ScriptOutcome = self.run_element_script(selector, body)?;
        match outcome.count {
            1 => Ok(()),
            0 => Err(E2eError::ElementNotFound(selector.to_string())),
            count => Err(E2eError::StrictModeViolation {
                selector: selector.to_string(),
                count,
            }),
        }
    }
}

#[async_trait]
impl Driver for ChromeDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| E2eError::NavigationFailed(e.to_string()))?;

        // Wait for navigation to complete
        self.tab
            .wait_until_navigated()
            .map_err(|e| E2eError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    async fn probe(&self, selector: &Selector) -> Result<ElementProbe> {
        self.run_element_script(selector, PROBE_BODY)
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        self.run_strict(selector, CLICK_BODY)
    }

    async fn set_value(&self, selector: &Selector, text: &str) -> Result<()> {
        self.run_strict(selector, &javascript::set_value_body(text)?)
    }

    async fn type_char(&self, selector: &Selector, ch: char) -> Result<()> {
        self.run_strict(selector, FOCUS_BODY)?;
        self.tab
            .type_str(&ch.to_string())
            .map_err(|e| E2eError::ChromeError(e.to_string()))?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| E2eError::ScreenshotFailed(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.tab
            .close(true)
            .map_err(|e| E2eError::ChromeError(e.to_string()))?;
        debug!(pid = ?self.browser.get_process_id(), "Chrome tab closed");
        Ok(())
    }
}
