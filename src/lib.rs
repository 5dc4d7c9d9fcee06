pub mod browser;
pub mod core;
pub mod dom;
pub mod errors;
pub mod pages;
pub mod scenarios;
pub mod testing;
pub mod utils;

pub use browser::{expect, expect_page, ChromeDriver, Locator, Session};
pub use crate::core::{
    ArtifactConfig, BrowserConfig, Driver, ScreenshotMode, Selector, SessionConfig, SuiteConfig,
    TextMatch,
};
pub use errors::{E2eError, Result};
pub use pages::{
    CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, Interactions,
    ItemsPage, LoginPage, RoutedPage, SidebarMenu, TitledPage,
};
pub use scenarios::{Scenario, ScenarioKind, ScenarioReport};
