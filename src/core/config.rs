use crate::errors::{E2eError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub browser: BrowserConfig,
    pub session: SessionConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub disable_images: bool,
    pub args: Vec<String>,
    pub idle_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub base_url: String,
    pub navigation_timeout_ms: u64,
    pub action_timeout_ms: u64,
    pub assertion_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub password_typing_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub screenshots: ScreenshotMode,
    pub write_reports: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenshotMode {
    Always,
    OnFailure,
    Off,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl SuiteConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: SuiteConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays `STOREFRONT_*` environment variables onto the loaded values.
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(base_url) = std::env::var("STOREFRONT_BASE_URL") {
            self.session.base_url = base_url;
        }
        if let Ok(headless) = std::env::var("STOREFRONT_HEADLESS") {
            self.browser.headless = parse_flag(&headless).ok_or_else(|| {
                E2eError::ConfigurationError(format!(
                    "STOREFRONT_HEADLESS must be true/false, got '{}'",
                    headless
                ))
            })?;
        }
        if let Ok(dir) = std::env::var("STOREFRONT_ARTIFACTS_DIR") {
            self.artifacts.dir = PathBuf::from(dir);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.session.base_url()?;
        if self.session.poll_interval_ms == 0 {
            return Err(E2eError::ConfigurationError(
                "session.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.browser.viewport.width == 0 || self.browser.viewport.height == 0 {
            return Err(E2eError::ConfigurationError(
                "browser.viewport must have a non-zero size".to_string(),
            ));
        }
        Ok(())
    }
}

impl SessionConfig {
    /// The storefront root, always with a trailing slash so page paths
    /// join beneath it instead of replacing its last segment.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(E2eError::ConfigurationError(format!(
                "base url '{}' cannot be used as a base",
                self.base_url
            )));
        }
        Ok(directory_url(url))
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    pub fn assertion_timeout(&self) -> Duration {
        Duration::from_millis(self.assertion_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn password_typing_delay(&self) -> Duration {
        Duration::from_millis(self.password_typing_delay_ms)
    }
}

/// Append a trailing slash to the path when it is missing.
pub fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            disable_images: false,
            args: vec![],
            idle_timeout_ms: 60000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            navigation_timeout_ms: 30000,
            action_timeout_ms: 5000,
            assertion_timeout_ms: 5000,
            poll_interval_ms: 100,
            password_typing_delay_ms: 350,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("test-results"),
            screenshots: ScreenshotMode::OnFailure,
            write_reports: true,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_storefront() {
        let config = SuiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.session.base_url().unwrap().as_str(),
            "https://www.saucedemo.com/"
        );
        assert_eq!(config.browser.viewport.width, 1920);
        assert_eq!(config.session.password_typing_delay(), Duration::from_millis(350));
        assert_eq!(config.artifacts.screenshots, ScreenshotMode::OnFailure);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SuiteConfig = serde_json::from_str(
            r#"{ "session": { "base_url": "http://localhost:8080/", "assertion_timeout_ms": 750 },
                 "artifacts": { "screenshots": "always" } }"#,
        )
        .unwrap();

        assert_eq!(config.session.base_url, "http://localhost:8080/");
        assert_eq!(config.session.assertion_timeout_ms, 750);
        assert_eq!(config.session.action_timeout_ms, 5000);
        assert_eq!(config.artifacts.screenshots, ScreenshotMode::Always);
        assert!(config.browser.headless);
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_last_segment() {
        let mut config = SuiteConfig::default();
        config.session.base_url = "http://localhost:8080/shop".to_string();
        assert!(config.validate().is_ok());

        let base = config.session.base_url().unwrap();
        assert_eq!(base.as_str(), "http://localhost:8080/shop/");
        assert_eq!(
            base.join("inventory.html").unwrap().as_str(),
            "http://localhost:8080/shop/inventory.html"
        );

        config.session.base_url = "http://localhost:8080".to_string();
        assert_eq!(
            config.session.base_url().unwrap().as_str(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let mut config = SuiteConfig::default();
        config.session.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.session.base_url = "mailto:qa@example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(E2eError::ConfigurationError(_))
        ));
    }

    #[test]
    fn from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.json");
        std::fs::write(&path, r#"{ "browser": { "headless": false } }"#).unwrap();

        let config = SuiteConfig::from_file(&path).unwrap();
        assert!(!config.browser.headless);
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
