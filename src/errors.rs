use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Strict mode violation: {selector} resolved to {count} elements")]
    StrictModeViolation { selector: String, count: usize },

    #[error("Element {selector} is not actionable: {reason}")]
    NotActionable { selector: String, reason: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("{subject} expected {expectation}\nActual value: {actual}\nTimeout: {timeout_ms}ms")]
    AssertionTimeout {
        subject: String,
        expectation: String,
        actual: String,
        timeout_ms: u64,
    },

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Test data error: {0}")]
    DataError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chrome error: {0}")]
    ChromeError(String),

    #[error("Anyhow error: {0}")]
    AnyhowError(String),
}

pub type Result<T> = std::result::Result<T, E2eError>;

// headless_chrome reports everything through anyhow
impl From<anyhow::Error> for E2eError {
    fn from(err: anyhow::Error) -> Self {
        E2eError::AnyhowError(err.to_string())
    }
}

impl E2eError {
    /// True for failures raised by a bounded-retry assertion.
    pub fn is_assertion(&self) -> bool {
        matches!(self, E2eError::AssertionTimeout { .. })
    }
}
