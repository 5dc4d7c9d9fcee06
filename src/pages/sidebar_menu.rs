use super::Interactions;
use crate::browser::{Locator, Session};
use crate::errors::Result;

/// Burger menu present on every page behind the login.
pub struct SidebarMenu {
    ui: Interactions,
    menu_button: Locator,
    reset_sidebar_link: Locator,
    logout_sidebar_link: Locator,
}

impl SidebarMenu {
    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "SidebarMenu"),
            menu_button: session.get_by_role("button", "Open Menu"),
            reset_sidebar_link: session.locator("[data-test='reset-sidebar-link']"),
            logout_sidebar_link: session.locator("[data-test='logout-sidebar-link']"),
        }
    }

    pub async fn click_menu_button(&self) -> Result<()> {
        self.ui.click(&self.menu_button, Some("Menu Button")).await
    }

    /// Clears the cart and any per-session app state.
    pub async fn click_reset_sidebar_link(&self) -> Result<()> {
        self.ui
            .click(&self.reset_sidebar_link, Some("Reset Sidebar Link"))
            .await
    }

    pub async fn click_logout_sidebar_link(&self) -> Result<()> {
        self.ui
            .click(&self.logout_sidebar_link, Some("Logout Sidebar Link"))
            .await
    }
}
