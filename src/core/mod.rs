pub mod config;
pub mod driver;
pub mod selector;

pub use config::{ArtifactConfig, BrowserConfig, ScreenshotMode, SessionConfig, SuiteConfig, Viewport};
pub use driver::{Driver, ElementProbe};
pub use selector::{Selector, TextMatch};
