use std::sync::Arc;
use std::time::Duration;
use storefront_e2e::pages::{
    CartPage, CheckoutInfoPage, ItemsPage, LoginPage, RoutedPage, SidebarMenu, TitledPage,
};
use storefront_e2e::testing::{CatalogItem, FakeStorefront, LogCapture, TestHelper};
use storefront_e2e::{E2eError, Session, SessionConfig};

fn fast() -> SessionConfig {
    SessionConfig {
        action_timeout_ms: 200,
        assertion_timeout_ms: 200,
        ..TestHelper::fast_config()
    }
}

async fn logged_in(store: FakeStorefront) -> (Arc<FakeStorefront>, Session) {
    let (store, session) = TestHelper::fake_session_with(store, fast()).unwrap();
    let login = LoginPage::new(&session);
    login.navigate_to_login_page().await.unwrap();
    login.fill_username("standard_user").await.unwrap();
    login.type_password("secret_sauce").await.unwrap();
    login.click_login_button().await.unwrap();
    (store, session)
}

#[tokio::test]
async fn valid_login_lands_on_products() {
    let (store, session) = logged_in(FakeStorefront::new()).await;
    let items = ItemsPage::new(&session);

    items.validate_page_title_text("Products").await.unwrap();
    items.validate_page_url().await.unwrap();
    items.validate_shopping_cart_link_is_visible().await.unwrap();
    assert_eq!(
        items.canonical_url().unwrap(),
        "https://www.saucedemo.com/inventory.html"
    );
    assert_eq!(store.logged_in_user().await.as_deref(), Some("standard_user"));
}

#[tokio::test]
async fn invalid_login_shows_error_and_stays_put() {
    let (_store, session) = TestHelper::fake_session_with(FakeStorefront::new(), fast()).unwrap();
    let login = LoginPage::new(&session);

    login.navigate_to_login_page().await.unwrap();
    login.fill_username("standard_user").await.unwrap();
    login.type_password("not_the_sauce").await.unwrap();
    login.click_login_button().await.unwrap();

    login
        .validate_login_error_message("Username and password do not match")
        .await
        .unwrap();
    login.validate_page_url().await.unwrap();
}

#[tokio::test]
async fn add_item_matches_the_exact_name_only() {
    let catalog = vec![
        CatalogItem::new("Sauce Labs Onesie", "infant", 799),
        CatalogItem::new("Onesie", "plain", 499),
        CatalogItem::new("Onesie Deluxe", "fancy", 1299),
    ];
    let (store, session) = logged_in(FakeStorefront::new().with_catalog(catalog)).await;
    let items = ItemsPage::new(&session);

    items.add_item_to_basket("Onesie").await.unwrap();

    assert_eq!(store.cart_items().await, vec!["Onesie"]);
    let clicks = store.clicks().await;
    assert_eq!(clicks.last().map(String::as_str), Some("add-to-cart-onesie"));
    items.validate_added_items_amount(1).await.unwrap();
}

#[tokio::test]
async fn add_item_logs_the_item_specific_name() {
    let logs = LogCapture::new();
    let _guard = logs.install();
    let (_store, session) = logged_in(FakeStorefront::new()).await;
    let items = ItemsPage::new(&session);

    items.add_item_to_basket("Sauce Labs Bike Light").await.unwrap();
    let err = items.add_item_to_basket("Sauce Labs").await.unwrap_err();

    assert!(matches!(err, E2eError::ElementNotFound(_)));
    assert!(logs.contains("Clicking: 'Add to cart button for Sauce Labs Bike Light' element"));
    assert!(logs.contains("Clicking: 'Add to cart button for Sauce Labs' element"));
    assert!(logs.contains("page=\"ItemsPage\""));
}

#[tokio::test]
async fn badge_counts_added_items() {
    let (store, session) = logged_in(FakeStorefront::new()).await;
    let items = ItemsPage::new(&session);
    let names = [
        "Sauce Labs Backpack",
        "Sauce Labs Fleece Jacket",
        "Test.allTheThings() T-Shirt (Red)",
    ];

    for name in names {
        items.add_item_to_basket(name).await.unwrap();
    }

    items.validate_added_items_amount(names.len()).await.unwrap();
    assert_eq!(store.cart_items().await, names);
}

#[tokio::test]
async fn cart_and_checkout_pages_have_their_own_urls() {
    let (_store, session) = logged_in(FakeStorefront::new()).await;
    let items = ItemsPage::new(&session);
    let cart = CartPage::new(&session);
    let info = CheckoutInfoPage::new(&session);

    items.add_item_to_basket("Sauce Labs Onesie").await.unwrap();
    items.click_shopping_cart_link().await.unwrap();
    cart.validate_page_title_text("Your Cart").await.unwrap();
    cart.validate_page_url().await.unwrap();

    cart.click_checkout_button().await.unwrap();
    info.validate_page_title_text("Checkout: Your Information")
        .await
        .unwrap();
    info.validate_page_url().await.unwrap();
    assert!(cart.validate_page_url().await.is_err());
}

#[tokio::test]
async fn checkout_form_reports_missing_postal_code() {
    let (store, session) = logged_in(FakeStorefront::new()).await;
    ItemsPage::new(&session).click_shopping_cart_link().await.unwrap();
    CartPage::new(&session).click_checkout_button().await.unwrap();
    let info = CheckoutInfoPage::new(&session);

    info.fill_first_name("Alex").await.unwrap();
    info.fill_last_name("Komanov").await.unwrap();
    info.click_continue_button().await.unwrap();

    info.validate_error_message("Postal Code is required")
        .await
        .unwrap();
    info.validate_page_url().await.unwrap();
    assert!(store.checkout_info().await.is_none());
}

#[tokio::test]
async fn sidebar_links_need_the_menu_open() {
    let (store, session) = logged_in(FakeStorefront::new()).await;
    let items = ItemsPage::new(&session);
    let menu = SidebarMenu::new(&session);
    items.add_item_to_basket("Sauce Labs Backpack").await.unwrap();

    let err = menu.click_reset_sidebar_link().await.unwrap_err();
    assert!(matches!(err, E2eError::NotActionable { .. }));

    menu.click_menu_button().await.unwrap();
    menu.click_reset_sidebar_link().await.unwrap();
    assert!(store.cart_items().await.is_empty());

    menu.click_logout_sidebar_link().await.unwrap();
    LoginPage::new(&session)
        .validate_login_container_is_visible()
        .await
        .unwrap();
}

#[tokio::test]
async fn password_is_typed_with_the_configured_delay() {
    let config = SessionConfig {
        password_typing_delay_ms: 15,
        ..fast()
    };
    let (store, session) = TestHelper::fake_session_with(FakeStorefront::new(), config).unwrap();
    let login = LoginPage::new(&session);
    login.navigate_to_login_page().await.unwrap();

    login.type_password("sauce").await.unwrap();

    let keys = store.keystrokes().await;
    assert_eq!(keys.len(), 5);
    assert!(keys.iter().all(|k| k.field == "password"));
    let spread = keys[4].at.duration_since(keys[0].at);
    assert!(spread >= Duration::from_millis(60));
}

#[tokio::test]
async fn canonical_urls_follow_the_configured_base() {
    let base = "http://localhost:8080/shop/";
    let store = FakeStorefront::new().with_base_url(base).unwrap();
    let config = SessionConfig {
        base_url: base.to_string(),
        ..fast()
    };
    let (_store, session) = TestHelper::fake_session_with(store, config).unwrap();
    let login = LoginPage::new(&session);
    let items = ItemsPage::new(&session);

    assert_eq!(login.canonical_url().unwrap(), base);
    assert_eq!(
        items.canonical_url().unwrap(),
        "http://localhost:8080/shop/inventory.html"
    );

    login.navigate_to_login_page().await.unwrap();
    login.fill_username("problem_user").await.unwrap();
    login.type_password("secret_sauce").await.unwrap();
    login.click_login_button().await.unwrap();
    items.validate_page_url().await.unwrap();
}

#[tokio::test]
async fn glitch_user_is_waited_for() {
    let store = FakeStorefront::new().with_login_delay(Duration::from_millis(80));
    let (_store, session) = TestHelper::fake_session_with(store, TestHelper::fast_config()).unwrap();
    let login = LoginPage::new(&session);
    let items = ItemsPage::new(&session);

    login.navigate_to_login_page().await.unwrap();
    login.fill_username("performance_glitch_user").await.unwrap();
    login.type_password("secret_sauce").await.unwrap();
    login.click_login_button().await.unwrap();

    items.validate_page_title_text("Products").await.unwrap();
    items.validate_page_url().await.unwrap();
}

#[tokio::test]
async fn base_url_without_trailing_slash_keeps_its_path() {
    let base = "http://localhost:8080/shop";
    let store = FakeStorefront::new().with_base_url(base).unwrap();
    let config = SessionConfig {
        base_url: base.to_string(),
        ..fast()
    };
    let (_store, session) = TestHelper::fake_session_with(store, config).unwrap();
    let login = LoginPage::new(&session);
    let items = ItemsPage::new(&session);

    assert_eq!(login.canonical_url().unwrap(), "http://localhost:8080/shop/");
    assert_eq!(
        items.canonical_url().unwrap(),
        "http://localhost:8080/shop/inventory.html"
    );

    login.navigate_to_login_page().await.unwrap();
    login.validate_page_url().await.unwrap();
    login.fill_username("standard_user").await.unwrap();
    login.type_password("secret_sauce").await.unwrap();
    login.click_login_button().await.unwrap();
    items.validate_page_url().await.unwrap();
    assert_eq!(
        session.current_url().await.unwrap(),
        "http://localhost:8080/shop/inventory.html"
    );
}
