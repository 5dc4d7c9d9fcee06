//! Scenario composition: ordered, reported steps over the page objects.

pub mod data;
pub mod flows;

use crate::browser::Session;
use crate::errors::Result;
use crate::utils::ArtifactRecorder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub use data::{load_negative_logins, negative_logins_from_reader, NegativeLoginCase};
pub use flows::PageSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    /// Inline text, or the file path for binary artifacts.
    pub body: String,
}

impl Attachment {
    pub fn text(name: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            content_type: "text/plain".to_string(),
            body: body.to_string(),
        }
    }

    pub fn file(name: &str, content_type: &str, path: &Path) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            body: path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub label: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub steps: Vec<StepRecord>,
    /// Attachments recorded outside any step, such as the final screenshot.
    pub attachments: Vec<Attachment>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// A running scenario. Steps are recorded in the order they run; a failing
/// step is logged and its error handed back untouched.
#[derive(Debug)]
pub struct Scenario {
    id: Uuid,
    name: String,
    started_at: DateTime<Utc>,
    steps: Vec<StepRecord>,
    attachments: Vec<Attachment>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            started_at: Utc::now(),
            steps: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub async fn step<T>(&mut self, label: &str, work: impl Future<Output = Result<T>>) -> Result<T> {
        info!(scenario = %self.name, "Step: {}", label);
        let started = Instant::now();
        let result = work.instrument(info_span!("step", label)).await;

        let (outcome, error) = match &result {
            Ok(_) => (Outcome::Passed, None),
            Err(e) => {
                error!(scenario = %self.name, "Step '{}' failed: {}", label, e);
                (Outcome::Failed, Some(e.to_string()))
            }
        };
        self.steps.push(StepRecord {
            label: label.to_string(),
            outcome,
            duration_ms: started.elapsed().as_millis() as u64,
            error,
            attachments: Vec::new(),
        });
        result
    }

    /// Attaches to the most recent step, or to the scenario before any step ran.
    pub fn attach(&mut self, attachment: Attachment) {
        match self.steps.last_mut() {
            Some(step) => step.attachments.push(attachment),
            None => self.attachments.push(attachment),
        }
    }

    pub fn attach_text(&mut self, name: &str, body: &str) {
        self.attach(Attachment::text(name, body));
    }

    /// Scenario-level attachment, independent of the last step.
    pub fn attach_to_scenario(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn finish(self, result: &Result<()>) -> ScenarioReport {
        let (outcome, error) = match result {
            Ok(()) => (Outcome::Passed, None),
            Err(e) => (Outcome::Failed, Some(e.to_string())),
        };
        ScenarioReport {
            id: self.id,
            name: self.name,
            started_at: self.started_at,
            finished_at: Utc::now(),
            outcome,
            error,
            steps: self.steps,
            attachments: self.attachments,
        }
    }
}

/// The scenarios the runner knows how to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioKind {
    FullCheckout,
    ExpressCheckout,
    LoginAs(String),
    NegativeLogin(NegativeLoginCase),
    CheckoutRequiresInfo,
}

impl ScenarioKind {
    pub fn name(&self) -> String {
        match self {
            ScenarioKind::FullCheckout => "full_checkout".to_string(),
            ScenarioKind::ExpressCheckout => "express_checkout".to_string(),
            ScenarioKind::LoginAs(user) => format!("login_as_{}", user),
            ScenarioKind::NegativeLogin(case) => format!(
                "negative_login_{}",
                if case.username.is_empty() {
                    "no_username"
                } else {
                    case.username.as_str()
                }
            ),
            ScenarioKind::CheckoutRequiresInfo => "checkout_requires_info".to_string(),
        }
    }
}

/// Runs one scenario on `session` and records its artifacts.
///
/// Scenario failures end up in the returned report; the session is left
/// open for the caller to close.
pub async fn run(kind: &ScenarioKind, session: &Session, recorder: &ArtifactRecorder) -> ScenarioReport {
    let mut scenario = Scenario::new(&kind.name());
    let pages = PageSet::new(session);

    let result = match kind {
        ScenarioKind::FullCheckout => flows::full_checkout(&mut scenario, &pages).await,
        ScenarioKind::ExpressCheckout => flows::express_checkout(&mut scenario, &pages).await,
        ScenarioKind::LoginAs(user) => flows::login_as(&mut scenario, &pages, user).await,
        ScenarioKind::NegativeLogin(case) => {
            flows::negative_login(&mut scenario, &pages, case).await
        }
        ScenarioKind::CheckoutRequiresInfo => {
            flows::checkout_requires_info(&mut scenario, &pages).await
        }
    };

    match &result {
        Ok(()) => info!(scenario = %scenario.name(), "Scenario passed"),
        Err(e) => error!(scenario = %scenario.name(), "Scenario failed: {}", e),
    }
    recorder.finish(scenario, result, session).await
}
