use crate::core::Selector;
use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Browser engine seam. Implementations resolve selectors against the live
/// page on every call and never cache element handles.
///
/// Element operations act on a strict match: when the selector does not
/// resolve to exactly one element they fail with `ElementNotFound` or
/// `StrictModeViolation` instead of picking one.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Load a URL and wait for the navigation to commit
    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Snapshot of what the selector currently resolves to
    async fn probe(&self, selector: &Selector) -> Result<ElementProbe>;

    async fn click(&self, selector: &Selector) -> Result<()>;

    /// Replace the element's value with `text`
    async fn set_value(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Focus the element and send a single character as a key event
    async fn type_char(&self, selector: &Selector, ch: char) -> Result<()>;

    /// Full-page PNG screenshot
    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn close(&self) -> Result<()>;
}

/// Result of resolving a selector once, without waiting.
///
/// The per-element fields describe the single match and are `false`/`None`
/// whenever `count != 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProbe {
    pub count: usize,
    pub visible: bool,
    pub enabled: bool,
    pub editable: bool,
    pub text: Option<String>,
}

impl ElementProbe {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn is_unique(&self) -> bool {
        self.count == 1
    }
}
