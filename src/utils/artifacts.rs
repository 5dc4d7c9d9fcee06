//! Screenshots and JSON reports written per scenario.

use crate::browser::Session;
use crate::core::{ArtifactConfig, ScreenshotMode};
use crate::errors::{E2eError, Result};
use crate::scenarios::{Attachment, Scenario, ScenarioReport};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub struct ArtifactRecorder {
    config: ArtifactConfig,
    unsafe_chars: Regex,
}

impl ArtifactRecorder {
    pub fn new(config: ArtifactConfig) -> Result<Self> {
        let unsafe_chars = Regex::new(r"[^A-Za-z0-9_-]+")
            .map_err(|e| E2eError::ConfigurationError(e.to_string()))?;
        Ok(Self {
            config,
            unsafe_chars,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    pub fn captures_screenshot(&self, failed: bool) -> bool {
        match self.config.screenshots {
            ScreenshotMode::Always => true,
            ScreenshotMode::OnFailure => failed,
            ScreenshotMode::Off => false,
        }
    }

    /// `Login as: standard_user` -> `Login_as_standard_user`
    pub fn file_stem(&self, name: &str) -> String {
        let stem = self.unsafe_chars.replace_all(name, "_");
        stem.trim_matches('_').to_string()
    }

    /// Closes out `scenario`: attaches a screenshot according to the
    /// configured mode and writes the JSON report. Artifact failures are
    /// logged and never change the scenario outcome.
    pub async fn finish(
        &self,
        mut scenario: Scenario,
        result: Result<()>,
        session: &Session,
    ) -> ScenarioReport {
        if self.captures_screenshot(result.is_err()) {
            match self.save_screenshot(scenario.name(), session).await {
                Ok(path) => {
                    scenario.attach_to_scenario(Attachment::file("Screenshot", "image/png", &path))
                }
                Err(e) => error!("Failed to attach screenshot: {}", e),
            }
        }

        let report = scenario.finish(&result);
        if self.config.write_reports {
            match self.write_report(&report).await {
                Ok(path) => info!("Report written to {}", path.display()),
                Err(e) => error!("Failed to write report for '{}': {}", report.name, e),
            }
        }
        report
    }

    pub async fn save_screenshot(&self, name: &str, session: &Session) -> Result<PathBuf> {
        let bytes = session.screenshot().await?;
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%3f");
        let path = self
            .config
            .dir
            .join(format!("{}-{}.png", self.file_stem(name), stamp));

        tokio::fs::create_dir_all(&self.config.dir).await?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub async fn write_report(&self, report: &ScenarioReport) -> Result<PathBuf> {
        let id = report.id.simple().to_string();
        let path = self.config.dir.join(format!(
            "{}-{}.json",
            self.file_stem(&report.name),
            &id[..8]
        ));

        tokio::fs::create_dir_all(&self.config.dir).await?;
        tokio::fs::write(&path, serde_json::to_vec_pretty(report)?).await?;
        Ok(path)
    }

    /// Writes the combined run summary next to the per-scenario reports.
    pub async fn write_summary(&self, reports: &[ScenarioReport]) -> Result<PathBuf> {
        let path = self.config.dir.join("summary.json");
        tokio::fs::create_dir_all(&self.config.dir).await?;
        tokio::fs::write(&path, serde_json::to_vec_pretty(reports)?).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHelper;

    fn recorder(dir: &Path, screenshots: ScreenshotMode) -> ArtifactRecorder {
        ArtifactRecorder::new(ArtifactConfig {
            dir: dir.to_path_buf(),
            screenshots,
            write_reports: true,
        })
        .unwrap()
    }

    #[test]
    fn file_stems_drop_unsafe_characters() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = recorder(tmp.path(), ScreenshotMode::Off);
        assert_eq!(recorder.file_stem("Login as: standard_user"), "Login_as_standard_user");
        assert_eq!(recorder.file_stem("full_checkout"), "full_checkout");
    }

    #[tokio::test]
    async fn failure_gets_screenshot_and_report() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = recorder(tmp.path(), ScreenshotMode::OnFailure);
        let (_store, session) = TestHelper::fake_session().unwrap();
        session.goto("https://www.saucedemo.com/").await.unwrap();

        let result = Err(E2eError::ElementNotFound("x".into()));
        let report = recorder.finish(Scenario::new("broken"), result, &session).await;

        assert!(!report.passed());
        assert_eq!(report.attachments.len(), 1);
        let png = Path::new(&report.attachments[0].body);
        assert!(png.exists());
        assert!(std::fs::read(png).unwrap().starts_with(b"\x89PNG"));

        let json_files = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |x| x == "json"))
            .count();
        assert_eq!(json_files, 1);
    }

    #[tokio::test]
    async fn passing_scenario_skips_screenshot_on_failure_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = recorder(tmp.path(), ScreenshotMode::OnFailure);
        let (_store, session) = TestHelper::fake_session().unwrap();

        let report = recorder.finish(Scenario::new("fine"), Ok(()), &session).await;
        assert!(report.passed());
        assert!(report.attachments.is_empty());
    }

    #[tokio::test]
    async fn screenshot_errors_do_not_change_the_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = recorder(tmp.path(), ScreenshotMode::Always);
        let (_store, session) = TestHelper::fake_session().unwrap();
        session.close().await.unwrap();

        let report = recorder.finish(Scenario::new("closed"), Ok(()), &session).await;
        assert!(report.passed());
        assert!(report.attachments.is_empty());
    }
}
