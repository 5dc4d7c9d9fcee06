//! Reusable flows and the scenarios built from them.

use super::{NegativeLoginCase, Scenario};
use crate::browser::Session;
use crate::errors::Result;
use crate::pages::{
    CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, ItemsPage, LoginPage,
    RoutedPage, SidebarMenu, TitledPage,
};

pub const PASSWORD: &str = "secret_sauce";

pub const CHECKOUT_ITEMS: [&str; 5] = [
    "Sauce Labs Backpack",
    "Sauce Labs Bike Light",
    "Sauce Labs Bolt T-Shirt",
    "Sauce Labs Fleece Jacket",
    "Sauce Labs Onesie",
];

pub const EXPRESS_ITEMS: [&str; 2] = ["Sauce Labs Backpack", "Sauce Labs Bike Light"];

pub const COMPLETE_TEXT: &str =
    "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

/// Users that can sign in and reach the catalog.
pub const LOGIN_USERS: [&str; 5] = [
    "standard_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

/// One of every page object, bound to the same session.
pub struct PageSet {
    pub login: LoginPage,
    pub items: ItemsPage,
    pub cart: CartPage,
    pub checkout_info: CheckoutInfoPage,
    pub checkout_overview: CheckoutOverviewPage,
    pub checkout_complete: CheckoutCompletePage,
    pub sidebar_menu: SidebarMenu,
}

impl PageSet {
    pub fn new(session: &Session) -> Self {
        Self {
            login: LoginPage::new(session),
            items: ItemsPage::new(session),
            cart: CartPage::new(session),
            checkout_info: CheckoutInfoPage::new(session),
            checkout_overview: CheckoutOverviewPage::new(session),
            checkout_complete: CheckoutCompletePage::new(session),
            sidebar_menu: SidebarMenu::new(session),
        }
    }
}

pub async fn perform_login(
    scenario: &mut Scenario,
    login: &LoginPage,
    username: &str,
    password: &str,
) -> Result<()> {
    let label = format!("Login with username: '{}'", username);
    scenario
        .step(&label, async {
            login.navigate_to_login_page().await?;
            login.fill_username(username).await?;
            login.type_password(password).await?;
            login.click_login_button().await
        })
        .await?;
    scenario.attach_text("Logged in Username", username);
    Ok(())
}

pub async fn add_items_to_cart(
    scenario: &mut Scenario,
    items_page: &ItemsPage,
    items: &[&str],
) -> Result<()> {
    let label = format!("Add items to cart: {:?}", items);
    scenario
        .step(&label, async {
            for item in items {
                items_page.add_item_to_basket(item).await?;
            }
            Ok(())
        })
        .await?;
    scenario.attach_text("Cart Summary", &format!("Added {} items", items.len()));
    Ok(())
}

pub async fn fill_checkout_information(
    scenario: &mut Scenario,
    page: &CheckoutInfoPage,
    first_name: &str,
    last_name: &str,
    postal_code: &str,
) -> Result<()> {
    let label = format!(
        "Complete checkout with customer info: {} {}, {}",
        first_name, last_name, postal_code
    );
    scenario
        .step(&label, async {
            page.fill_first_name(first_name).await?;
            page.fill_last_name(last_name).await?;
            page.fill_postal_code(postal_code).await?;
            page.click_continue_button().await
        })
        .await?;
    let summary = format!(
        "Name: {} {}\nPostal Code: {}",
        first_name, last_name, postal_code
    );
    scenario.attach_text("Customer Information", &summary);
    Ok(())
}

pub async fn verify_and_logout(scenario: &mut Scenario, pages: &PageSet) -> Result<()> {
    scenario
        .step("Verify order completion and logout", async {
            let complete = &pages.checkout_complete;
            complete.validate_complete_header_is_visible().await?;
            complete.validate_page_title_text("Checkout: Complete!").await?;
            complete.click_back_to_products_button().await?;

            pages.sidebar_menu.click_menu_button().await?;
            pages.sidebar_menu.click_logout_sidebar_link().await?;
            pages.login.validate_login_container_is_visible().await
        })
        .await
}

/// Five items from login to order confirmation, then reset and log out.
pub async fn full_checkout(scenario: &mut Scenario, pages: &PageSet) -> Result<()> {
    perform_login(scenario, &pages.login, "standard_user", PASSWORD).await?;

    scenario
        .step("Verify Items page is loaded and validate elements", async {
            pages.items.validate_page_title_text("Products").await?;
            pages.items.validate_page_url().await?;
            pages.items.validate_shopping_cart_link_is_visible().await
        })
        .await?;

    add_items_to_cart(scenario, &pages.items, &CHECKOUT_ITEMS).await?;

    scenario
        .step("Verify cart badge and navigate to cart", async {
            pages
                .items
                .validate_added_items_amount(CHECKOUT_ITEMS.len())
                .await?;
            pages.items.click_shopping_cart_link().await
        })
        .await?;

    scenario
        .step("Verify cart page and proceed to checkout", async {
            pages.cart.validate_page_title_text("Your Cart").await?;
            pages.cart.validate_page_url().await?;
            pages.cart.click_checkout_button().await
        })
        .await?;

    scenario
        .step("Verify checkout information page", async {
            pages
                .checkout_info
                .validate_page_title_text("Checkout: Your Information")
                .await?;
            pages.checkout_info.validate_page_url().await
        })
        .await?;
    fill_checkout_information(scenario, &pages.checkout_info, "Alex", "Komanov", "20100").await?;

    scenario
        .step("Verify checkout overview and complete the order", async {
            let overview = &pages.checkout_overview;
            overview.validate_page_title_text("Checkout: Overview").await?;
            overview.validate_page_url().await?;
            overview.validate_payment_info_label_is_visible().await?;
            overview
                .validate_shipping_info_label_text("Shipping Information:")
                .await?;
            overview.validate_total_info_label_is_visible().await?;
            overview.click_finish_button().await
        })
        .await?;

    scenario
        .step("Verify order completion message", async {
            let complete = &pages.checkout_complete;
            complete.validate_complete_header_is_visible().await?;
            complete.validate_page_title_text("Checkout: Complete!").await?;
            complete.validate_page_url().await?;
            complete.validate_complete_text(COMPLETE_TEXT).await?;
            complete.validate_back_to_products_button_is_visible().await
        })
        .await?;

    scenario
        .step("Return to products page and logout", async {
            pages.checkout_complete.click_back_to_products_button().await?;
            pages.sidebar_menu.click_menu_button().await?;
            pages.sidebar_menu.click_reset_sidebar_link().await?;
            pages.sidebar_menu.click_logout_sidebar_link().await
        })
        .await?;

    scenario
        .step("Verify successful logout", async {
            pages.login.validate_login_container_is_visible().await?;
            pages.login.validate_page_url().await
        })
        .await
}

/// Two items through checkout using only the reusable flows.
pub async fn express_checkout(scenario: &mut Scenario, pages: &PageSet) -> Result<()> {
    perform_login(scenario, &pages.login, "standard_user", PASSWORD).await?;

    scenario
        .step("Verify products page loaded", async {
            pages.items.validate_page_title_text("Products").await?;
            pages.items.validate_page_url().await
        })
        .await?;

    add_items_to_cart(scenario, &pages.items, &EXPRESS_ITEMS).await?;

    scenario
        .step("Navigate to cart and proceed to checkout", async {
            pages.items.click_shopping_cart_link().await?;
            pages.cart.validate_page_title_text("Your Cart").await?;
            pages.cart.click_checkout_button().await
        })
        .await?;

    fill_checkout_information(scenario, &pages.checkout_info, "John", "Smith", "90210").await?;

    scenario
        .step("Review and complete order", async {
            pages
                .checkout_overview
                .validate_page_title_text("Checkout: Overview")
                .await?;
            pages.checkout_overview.click_finish_button().await
        })
        .await?;

    verify_and_logout(scenario, pages).await
}

pub async fn login_as(scenario: &mut Scenario, pages: &PageSet, username: &str) -> Result<()> {
    perform_login(scenario, &pages.login, username, PASSWORD).await?;

    scenario
        .step("Verify successful login and products page is displayed", async {
            pages.items.validate_page_title_text("Products").await?;
            pages.items.validate_page_url().await?;
            pages.items.validate_shopping_cart_link_is_visible().await
        })
        .await
}

pub async fn negative_login(
    scenario: &mut Scenario,
    pages: &PageSet,
    case: &NegativeLoginCase,
) -> Result<()> {
    let login = &pages.login;

    scenario
        .step("Navigate to login page", login.navigate_to_login_page())
        .await?;

    let label = format!(
        "Enter credentials: username='{}', password='***'",
        case.username
    );
    scenario
        .step(&label, async {
            login.fill_username(&case.username).await?;
            login.type_password(&case.password).await
        })
        .await?;
    scenario.attach_text("Username", &case.username);

    scenario
        .step("Click login button", login.click_login_button())
        .await?;

    let label = format!("Verify error message: '{}'", case.error_message);
    scenario
        .step(&label, async {
            login.validate_login_error_message(&case.error_message).await?;
            login.validate_page_url().await
        })
        .await?;
    scenario.attach_text("Expected Error Message", &case.error_message);
    Ok(())
}

/// Continuing checkout with an empty form keeps the buyer on the form.
pub async fn checkout_requires_info(scenario: &mut Scenario, pages: &PageSet) -> Result<()> {
    perform_login(scenario, &pages.login, "standard_user", PASSWORD).await?;
    add_items_to_cart(scenario, &pages.items, &CHECKOUT_ITEMS[..1]).await?;

    scenario
        .step("Open checkout with an empty form", async {
            pages.items.click_shopping_cart_link().await?;
            pages.cart.click_checkout_button().await?;
            pages.checkout_info.click_continue_button().await
        })
        .await?;

    scenario
        .step("Verify first name is required", async {
            pages
                .checkout_info
                .validate_error_message("Error: First Name is required")
                .await?;
            pages.checkout_info.validate_page_url().await
        })
        .await?;

    scenario
        .step("Fill first name only and continue", async {
            pages.checkout_info.fill_first_name("Alex").await?;
            pages.checkout_info.click_continue_button().await?;
            pages
                .checkout_info
                .validate_error_message("Error: Last Name is required")
                .await
        })
        .await
}
