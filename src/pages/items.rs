use super::{Interactions, RoutedPage, TitledPage, PAGE_TITLE};
use crate::browser::{Locator, Session};
use crate::core::TextMatch;
use crate::errors::Result;
use async_trait::async_trait;

const ITEM_NAME: &str = "[data-test='inventory-item-name']";

/// The product catalog shown after a successful login.
pub struct ItemsPage {
    ui: Interactions,
    shopping_cart_link: Locator,
    page_title: Locator,
    shopping_cart_badge: Locator,
    item_card: Locator,
}

impl ItemsPage {
    pub const PATH: &'static str = "inventory.html";

    pub fn new(session: &Session) -> Self {
        Self {
            ui: Interactions::new(session, "ItemsPage"),
            shopping_cart_link: session.locator("[data-test='shopping-cart-link']"),
            page_title: session.locator(PAGE_TITLE),
            shopping_cart_badge: session.locator("[data-test='shopping-cart-badge']"),
            item_card: session.locator("[data-test=\"inventory-item-description\"]"),
        }
    }

    pub async fn validate_shopping_cart_link_is_visible(&self) -> Result<()> {
        self.ui
            .verify_visible(&self.shopping_cart_link, Some("Shopping Cart Link"))
            .await
    }

    /// Clicks "Add to cart" on the card whose item name equals `item_name`
    /// exactly. Cards whose names merely contain it are not candidates.
    pub async fn add_item_to_basket(&self, item_name: &str) -> Result<()> {
        let name = self
            .ui
            .session()
            .locator(ITEM_NAME)
            .filter_text(TextMatch::Exact(item_name.to_string()));
        let button = self
            .item_card
            .filter_has(&name)
            .get_by_role("button", "Add to cart");

        let label = format!("Add to cart button for {}", item_name);
        self.ui.click(&button, Some(&label)).await
    }

    pub async fn validate_added_items_amount(&self, amount: usize) -> Result<()> {
        self.ui
            .verify_contains_text(
                &self.shopping_cart_badge,
                &amount.to_string(),
                Some("Shopping Cart Badge"),
            )
            .await
    }

    pub async fn click_shopping_cart_link(&self) -> Result<()> {
        self.ui
            .click(&self.shopping_cart_link, Some("Shopping Cart Link"))
            .await
    }
}

#[async_trait]
impl TitledPage for ItemsPage {
    async fn validate_page_title_text(&self, expected: &str) -> Result<()> {
        self.ui
            .verify_contains_text(&self.page_title, expected, Some("Page Title"))
            .await
    }
}

#[async_trait]
impl RoutedPage for ItemsPage {
    fn canonical_url(&self) -> Result<String> {
        self.ui.session().url_for(Self::PATH)
    }

    async fn validate_page_url(&self) -> Result<()> {
        self.ui.verify_url(&self.canonical_url()?).await
    }
}
