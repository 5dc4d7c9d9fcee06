//! Page objects for the storefront.
//!
//! Each page binds its element locators once in `new` and exposes only
//! named operations built from [`Interactions`]; the locators themselves
//! never leave the page object.

pub mod base;
pub mod cart;
pub mod checkout_complete;
pub mod checkout_info;
pub mod checkout_overview;
pub mod items;
pub mod login;
pub mod sidebar_menu;

use crate::errors::Result;
use async_trait::async_trait;

pub use base::{display_name, mask_secret, Interactions};
pub use cart::CartPage;
pub use checkout_complete::CheckoutCompletePage;
pub use checkout_info::CheckoutInfoPage;
pub use checkout_overview::CheckoutOverviewPage;
pub use items::ItemsPage;
pub use login::LoginPage;
pub use sidebar_menu::SidebarMenu;

pub const PAGE_TITLE: &str = "[data-test='title']";

/// Screens that carry the shared secondary-header title.
#[async_trait]
pub trait TitledPage: Send + Sync {
    async fn validate_page_title_text(&self, expected: &str) -> Result<()>;
}

/// Screens with a fixed address relative to the storefront base URL.
#[async_trait]
pub trait RoutedPage: Send + Sync {
    /// Base URL joined with the page's path constant.
    fn canonical_url(&self) -> Result<String>;

    async fn validate_page_url(&self) -> Result<()>;
}
