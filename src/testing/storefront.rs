//! In-memory storefront driver.
//!
//! Renders saucedemo-shaped HTML for the current state on every call and
//! resolves selectors against it with [`crate::dom::Document`], so page
//! objects run unchanged against it. Clicks are dispatched on the target's
//! `data-test` attribute (or `id` when there is none).

use crate::core::config::{directory_url, DEFAULT_BASE_URL};
use crate::core::{Driver, ElementProbe, Selector};
use crate::dom::Document;
use crate::errors::{E2eError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;
use url::Url;

pub const STANDARD_USER: &str = "standard_user";
pub const LOCKED_OUT_USER: &str = "locked_out_user";
pub const PROBLEM_USER: &str = "problem_user";
pub const PERFORMANCE_GLITCH_USER: &str = "performance_glitch_user";
pub const ERROR_USER: &str = "error_user";
pub const VISUAL_USER: &str = "visual_user";
pub const PASSWORD: &str = "secret_sauce";

const USERS: [&str; 6] = [
    STANDARD_USER,
    LOCKED_OUT_USER,
    PROBLEM_USER,
    PERFORMANCE_GLITCH_USER,
    ERROR_USER,
    VISUAL_USER,
];

const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(250);

// 1x1 transparent PNG
const BLANK_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    pub description: String,
    pub price_cents: u32,
}

impl CatalogItem {
    pub fn new(name: &str, description: &str, price_cents: u32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price_cents,
        }
    }

    /// `Sauce Labs Bolt T-Shirt` -> `sauce-labs-bolt-t-shirt`
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

pub fn default_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("Sauce Labs Backpack", "carry.allTheThings() with the sleek, streamlined Sly Pack.", 2999),
        CatalogItem::new("Sauce Labs Bike Light", "A red light isn't the desired state in testing but it sure helps when riding your bike at night.", 999),
        CatalogItem::new("Sauce Labs Bolt T-Shirt", "Get your testing superhero on with the Sauce Labs bolt T-shirt.", 1599),
        CatalogItem::new("Sauce Labs Fleece Jacket", "It's not every day that you come across a midweight quarter-zip fleece jacket.", 4999),
        CatalogItem::new("Sauce Labs Onesie", "Rib snap infant onesie for the junior automation engineer in development.", 799),
        CatalogItem::new("Test.allTheThings() T-Shirt (Red)", "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard.", 1599),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

#[derive(Debug, Clone)]
pub struct Keystroke {
    pub field: String,
    pub ch: char,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
    NotFound,
}

impl Screen {
    fn from_path(path: &str) -> Self {
        match path {
            "" | "index.html" => Screen::Login,
            "inventory.html" => Screen::Inventory,
            "cart.html" => Screen::Cart,
            "checkout-step-one.html" => Screen::CheckoutInfo,
            "checkout-step-two.html" => Screen::CheckoutOverview,
            "checkout-complete.html" => Screen::CheckoutComplete,
            _ => Screen::NotFound,
        }
    }

    fn requires_login(self) -> bool {
        !matches!(self, Screen::Blank | Screen::Login | Screen::NotFound)
    }

    fn title(self) -> &'static str {
        match self {
            Screen::Inventory => "Products",
            Screen::Cart => "Your Cart",
            Screen::CheckoutInfo => "Checkout: Your Information",
            Screen::CheckoutOverview => "Checkout: Overview",
            Screen::CheckoutComplete => "Checkout: Complete!",
            _ => "",
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// Path relative to the base URL, `None` before the first navigation.
    page: Option<String>,
    inputs: HashMap<String, String>,
    user: Option<String>,
    cart: Vec<usize>,
    error: Option<String>,
    menu_open: bool,
    checkout: Option<CheckoutInfo>,
    pending: Option<(Instant, String)>,
    clicks: Vec<String>,
    keystrokes: Vec<Keystroke>,
    closed: bool,
}

impl StoreState {
    fn screen(&self) -> Screen {
        self.page.as_deref().map_or(Screen::Blank, Screen::from_path)
    }

    fn input(&self, key: &str) -> String {
        self.inputs.get(key).cloned().unwrap_or_default()
    }
}

/// What a strict selector resolved to, detached from the parsed document.
struct Target {
    tag: String,
    key: Option<String>,
}

impl Target {
    fn label(&self) -> String {
        self.key.clone().unwrap_or_else(|| self.tag.clone())
    }
}

pub struct FakeStorefront {
    /// Normalized base URL; every routed page is a path relative to it.
    base: String,
    catalog: Vec<CatalogItem>,
    login_delay: Duration,
    state: Mutex<StoreState>,
}

impl Default for FakeStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeStorefront {
    pub fn new() -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
            catalog: default_catalog(),
            login_delay: DEFAULT_LOGIN_DELAY,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Serve the store under another base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base = directory_url(Url::parse(base_url)?).to_string();
        Ok(self)
    }

    pub fn with_catalog(mut self, catalog: Vec<CatalogItem>) -> Self {
        self.catalog = catalog;
        self
    }

    /// How long the performance glitch user waits before the catalog loads.
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub async fn clicks(&self) -> Vec<String> {
        self.state.lock().await.clicks.clone()
    }

    pub async fn keystrokes(&self) -> Vec<Keystroke> {
        self.state.lock().await.keystrokes.clone()
    }

    pub async fn cart_items(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state
            .cart
            .iter()
            .map(|&i| self.catalog[i].name.clone())
            .collect()
    }

    pub async fn input_value(&self, key: &str) -> Option<String> {
        self.state.lock().await.inputs.get(key).cloned()
    }

    pub async fn logged_in_user(&self) -> Option<String> {
        self.state.lock().await.user.clone()
    }

    pub async fn checkout_info(&self) -> Option<CheckoutInfo> {
        self.state.lock().await.checkout.clone()
    }

    /// The document as a probe would currently see it.
    pub async fn html(&self) -> String {
        let mut state = self.state.lock().await;
        self.settle(&mut state);
        self.render(&state)
    }

    async fn live_state(&self) -> Result<MutexGuard<'_, StoreState>> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(E2eError::ChromeError("browser has been closed".to_string()));
        }
        self.settle(&mut state);
        Ok(state)
    }

    fn settle(&self, state: &mut StoreState) {
        let due = matches!(&state.pending, Some((at, _)) if Instant::now() >= *at);
        if due {
            if let Some((_, path)) = state.pending.take() {
                self.open(state, &path);
            }
        }
    }

    fn open(&self, state: &mut StoreState, path: &str) {
        let screen = Screen::from_path(path);
        state.inputs.clear();
        state.error = None;
        state.menu_open = false;

        if screen.requires_login() && state.user.is_none() {
            debug!(path, "redirecting anonymous visitor to login");
            state.page = Some(String::new());
            state.error = Some(format!(
                "Epic sadface: You can only access '/{}' when you are logged in.",
                path
            ));
            return;
        }
        state.page = Some(path.to_string());
    }

    fn target(&self, state: &StoreState, selector: &Selector) -> Result<Target> {
        let doc = Document::parse(&self.render(state));
        let el = doc.resolve_one(selector)?;
        let element = el.value();
        Ok(Target {
            tag: element.name().to_string(),
            key: element
                .attr("data-test")
                .or_else(|| element.attr("id"))
                .map(str::to_string),
        })
    }

    fn editable_key(&self, state: &StoreState, selector: &Selector) -> Result<String> {
        let target = self.target(state, selector)?;
        match (target.tag.as_str(), target.key) {
            ("input" | "textarea", Some(key)) => Ok(key),
            _ => Err(E2eError::NotActionable {
                selector: selector.to_string(),
                reason: "element is not editable".to_string(),
            }),
        }
    }

    fn activate(&self, state: &mut StoreState, target: &Target) {
        let key = target.key.as_deref().unwrap_or_default();
        match key {
            "login-button" => self.submit_login(state),
            "shopping-cart-link" => self.open(state, "cart.html"),
            "continue-shopping" | "back-to-products" | "inventory-sidebar-link" => {
                self.open(state, "inventory.html")
            }
            "checkout" => self.open(state, "checkout-step-one.html"),
            "continue" => self.submit_checkout_info(state),
            "cancel" => {
                let back = match state.screen() {
                    Screen::CheckoutInfo => "cart.html",
                    _ => "inventory.html",
                };
                self.open(state, back);
            }
            "finish" => {
                state.cart.clear();
                self.open(state, "checkout-complete.html");
            }
            "react-burger-menu-btn" => state.menu_open = true,
            "react-burger-cross-btn" => state.menu_open = false,
            "reset-sidebar-link" => state.cart.clear(),
            "logout-sidebar-link" => {
                state.user = None;
                self.open(state, "");
            }
            "error-button" => state.error = None,
            _ => {
                if let Some(slug) = key.strip_prefix("add-to-cart-") {
                    if let Some(index) = self.item_by_slug(slug) {
                        if !state.cart.contains(&index) {
                            state.cart.push(index);
                        }
                    }
                } else if let Some(slug) = key.strip_prefix("remove-") {
                    if let Some(index) = self.item_by_slug(slug) {
                        state.cart.retain(|&i| i != index);
                    }
                }
            }
        }
    }

    fn item_by_slug(&self, slug: &str) -> Option<usize> {
        self.catalog.iter().position(|item| item.slug() == slug)
    }

    fn submit_login(&self, state: &mut StoreState) {
        let username = state.input("username");
        let password = state.input("password");

        let error = if username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if password != PASSWORD || !USERS.contains(&username.as_str()) {
            Some("Epic sadface: Username and password do not match any user in this service")
        } else if username == LOCKED_OUT_USER {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else {
            None
        };

        if let Some(message) = error {
            state.error = Some(message.to_string());
            return;
        }

        debug!(user = %username, "login accepted");
        let glitchy = username == PERFORMANCE_GLITCH_USER && !self.login_delay.is_zero();
        state.user = Some(username);
        if glitchy {
            state.pending = Some((Instant::now() + self.login_delay, "inventory.html".to_string()));
        } else {
            self.open(state, "inventory.html");
        }
    }

    fn submit_checkout_info(&self, state: &mut StoreState) {
        let info = CheckoutInfo {
            first_name: state.input("firstName"),
            last_name: state.input("lastName"),
            postal_code: state.input("postalCode"),
        };

        let error = if info.first_name.is_empty() {
            Some("Error: First Name is required")
        } else if info.last_name.is_empty() {
            Some("Error: Last Name is required")
        } else if info.postal_code.is_empty() {
            Some("Error: Postal Code is required")
        } else {
            None
        };

        match error {
            Some(message) => state.error = Some(message.to_string()),
            None => {
                state.checkout = Some(info);
                self.open(state, "checkout-step-two.html");
            }
        }
    }

    fn render(&self, state: &StoreState) -> String {
        let screen = state.screen();
        let body = match screen {
            Screen::Blank => String::new(),
            Screen::Login => self.render_login(state),
            Screen::NotFound => "<h1>404 Not Found</h1>".to_string(),
            _ => {
                let content = match screen {
                    Screen::Inventory => self.render_inventory(state),
                    Screen::Cart => self.render_cart(state),
                    Screen::CheckoutInfo => render_checkout_info(state),
                    Screen::CheckoutOverview => self.render_overview(state),
                    _ => render_complete(),
                };
                format!(
                    r#"<div id="page_wrapper">{header}<div class="header_secondary_container" data-test="secondary-header"><span class="title" data-test="title">{title}</span></div>{content}</div>"#,
                    header = self.render_header(state),
                    title = screen.title(),
                    content = content,
                )
            }
        };
        format!("<html><head><title>Swag Labs</title></head><body>{}</body></html>", body)
    }

    fn render_login(&self, state: &StoreState) -> String {
        format!(
            r#"<div class="login_logo">Swag Labs</div>
<div class="login_container" data-test="login-container">
  <div class="login_wrapper-inner">
    <div id="login_button_container" class="form_column">
      <div class="login-box">
        <form>
          <div class="form_group"><input class="form_input" placeholder="Username" type="text" data-test="username" id="user-name" name="user-name" value="{username}"></div>
          <div class="form_group"><input class="form_input" placeholder="Password" type="password" data-test="password" id="password" name="password" value="{password}"></div>
          {error}
          <input type="submit" class="submit-button btn_action" data-test="login-button" id="login-button" name="login-button" value="Login">
        </form>
      </div>
    </div>
  </div>
  <div class="login_credentials_wrap">
    <div class="login_credentials" data-test="login-credentials"><h4>Accepted usernames are:</h4>{users}</div>
    <div class="login_password" data-test="login-password"><h4>Password for all users:</h4>{secret}</div>
  </div>
</div>"#,
            username = escape(&state.input("username")),
            password = escape(&state.input("password")),
            error = render_error(state),
            users = USERS.join("<br>"),
            secret = PASSWORD,
        )
    }

    fn render_header(&self, state: &StoreState) -> String {
        let menu_hidden = if state.menu_open { "" } else { " hidden" };
        let badge = if state.cart.is_empty() {
            String::new()
        } else {
            format!(
                r#"<span class="shopping_cart_badge" data-test="shopping-cart-badge">{}</span>"#,
                state.cart.len()
            )
        };
        format!(
            r##"<div class="primary_header" data-test="primary-header">
  <div id="menu_button_container">
    <div class="bm-burger-button"><button type="button" id="react-burger-menu-btn">Open Menu</button></div>
    <div class="bm-menu-wrap"{menu_hidden}>
      <nav class="bm-item-list">
        <a id="inventory_sidebar_link" class="bm-item menu-item" data-test="inventory-sidebar-link" href="#">All Items</a>
        <a id="about_sidebar_link" class="bm-item menu-item" data-test="about-sidebar-link" href="https://saucelabs.com/">About</a>
        <a id="logout_sidebar_link" class="bm-item menu-item" data-test="logout-sidebar-link" href="#">Logout</a>
        <a id="reset_sidebar_link" class="bm-item menu-item" data-test="reset-sidebar-link" href="#">Reset App State</a>
      </nav>
      <button type="button" id="react-burger-cross-btn">Close Menu</button>
    </div>
  </div>
  <div class="header_label"><div class="app_logo">Swag Labs</div></div>
  <div id="shopping_cart_container" class="shopping_cart_container"><a class="shopping_cart_link" data-test="shopping-cart-link" href="#">{badge}</a></div>
</div>"##,
            menu_hidden = menu_hidden,
            badge = badge,
        )
    }

    fn render_inventory(&self, state: &StoreState) -> String {
        let cards: String = self
            .catalog
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let (action, label) = if state.cart.contains(&i) {
                    ("remove", "Remove")
                } else {
                    ("add-to-cart", "Add to cart")
                };
                format!(
                    r##"<div class="inventory_item" data-test="inventory-item">
  <div class="inventory_item_description" data-test="inventory-item-description">
    <div class="inventory_item_label"><a href="#" id="item_{i}_title_link" data-test="item-{i}-title-link"><div class="inventory_item_name" data-test="inventory-item-name">{name}</div></a><div class="inventory_item_desc" data-test="inventory-item-desc">{description}</div></div>
    <div class="pricebar"><div class="inventory_item_price" data-test="inventory-item-price">{price}</div><button class="btn btn_inventory" data-test="{action}-{slug}" id="{action}-{slug}" name="{action}-{slug}">{label}</button></div>
  </div>
</div>"##,
                    i = i,
                    name = escape(&item.name),
                    description = escape(&item.description),
                    price = format_price(item.price_cents),
                    action = action,
                    slug = item.slug(),
                    label = label,
                )
            })
            .collect();
        format!(
            r#"<div class="inventory_container"><div class="inventory_list" data-test="inventory-list">{}</div></div>"#,
            cards
        )
    }

    fn render_cart_items(&self, state: &StoreState, removable: bool) -> String {
        state
            .cart
            .iter()
            .map(|&i| {
                let item = &self.catalog[i];
                let remove = if removable {
                    format!(
                        r#"<button class="btn btn_secondary cart_button" data-test="remove-{slug}" id="remove-{slug}">Remove</button>"#,
                        slug = item.slug()
                    )
                } else {
                    String::new()
                };
                format!(
                    r#"<div class="cart_item" data-test="inventory-item"><div class="cart_quantity" data-test="item-quantity">1</div><div class="cart_item_label"><div class="inventory_item_name" data-test="inventory-item-name">{name}</div><div class="item_pricebar"><div class="inventory_item_price" data-test="inventory-item-price">{price}</div>{remove}</div></div></div>"#,
                    name = escape(&item.name),
                    price = format_price(item.price_cents),
                    remove = remove,
                )
            })
            .collect()
    }

    fn render_cart(&self, state: &StoreState) -> String {
        format!(
            r#"<div id="cart_contents_container"><div class="cart_list" data-test="cart-list">{items}</div>
<div class="cart_footer">
  <button class="btn btn_secondary back" data-test="continue-shopping" id="continue-shopping">Continue Shopping</button>
  <button class="btn btn_action checkout_button" data-test="checkout" id="checkout">Checkout</button>
</div></div>"#,
            items = self.render_cart_items(state, true),
        )
    }

    fn render_overview(&self, state: &StoreState) -> String {
        let subtotal: u32 = state.cart.iter().map(|&i| self.catalog[i].price_cents).sum();
        let tax = (subtotal * 8 + 50) / 100;
        format!(
            r#"<div id="checkout_summary_container"><div class="cart_list" data-test="cart-list">{items}</div>
<div class="summary_info">
  <div class="summary_info_label" data-test="payment-info-label">Payment Information:</div>
  <div class="summary_value_label" data-test="payment-info-value">SauceCard #31337</div>
  <div class="summary_info_label" data-test="shipping-info-label">Shipping Information:</div>
  <div class="summary_value_label" data-test="shipping-info-value">Free Pony Express Delivery!</div>
  <div class="summary_info_label" data-test="total-info-label">Price Total</div>
  <div class="summary_subtotal_label" data-test="subtotal-label">Item total: {subtotal}</div>
  <div class="summary_tax_label" data-test="tax-label">Tax: {tax}</div>
  <div class="summary_total_label" data-test="total-label">Total: {total}</div>
  <div class="cart_footer">
    <button class="btn btn_secondary cart_cancel_link" data-test="cancel" id="cancel">Cancel</button>
    <button class="btn btn_action cart_button" data-test="finish" id="finish">Finish</button>
  </div>
</div></div>"#,
            items = self.render_cart_items(state, false),
            subtotal = format_price(subtotal),
            tax = format_price(tax),
            total = format_price(subtotal + tax),
        )
    }
}

fn render_checkout_info(state: &StoreState) -> String {
    format!(
        r#"<div id="checkout_info_container"><form>
  <div class="checkout_info">
    <div class="form_group"><input class="input_error form_input" placeholder="First Name" type="text" data-test="firstName" id="first-name" name="firstName" value="{first}"></div>
    <div class="form_group"><input class="input_error form_input" placeholder="Last Name" type="text" data-test="lastName" id="last-name" name="lastName" value="{last}"></div>
    <div class="form_group"><input class="input_error form_input" placeholder="Zip/Postal Code" type="text" data-test="postalCode" id="postal-code" name="postalCode" value="{postal}"></div>
    {error}
  </div>
  <div class="checkout_buttons">
    <button class="btn btn_secondary back cart_cancel_link" data-test="cancel" id="cancel">Cancel</button>
    <input type="submit" class="submit-button btn btn_primary cart_button btn_action" data-test="continue" id="continue" name="continue" value="Continue">
  </div>
</form></div>"#,
        first = escape(&state.input("firstName")),
        last = escape(&state.input("lastName")),
        postal = escape(&state.input("postalCode")),
        error = render_error(state),
    )
}

fn render_complete() -> String {
    r#"<div id="checkout_complete_container" class="checkout_complete_container">
  <img alt="Pony Express" class="pony_express" data-test="pony-express" src="/static/media/pony-express.png">
  <h2 class="complete-header" data-test="complete-header">Thank you for your order!</h2>
  <div class="complete-text" data-test="complete-text">Your order has been dispatched, and will arrive just as fast as the pony can get there!</div>
  <button class="btn btn_primary btn_small" data-test="back-to-products" id="back-to-products">Back Home</button>
</div>"#
        .to_string()
}

fn render_error(state: &StoreState) -> String {
    match &state.error {
        Some(message) => format!(
            r#"<div class="error-message-container error"><h3 data-test="error">{}</h3></div>"#,
            escape(message)
        ),
        None => r#"<div class="error-message-container"></div>"#.to_string(),
    }
}

fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[async_trait]
impl Driver for FakeStorefront {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut target =
            Url::parse(url).map_err(|e| E2eError::NavigationFailed(format!("{}: {}", url, e)))?;
        target.set_query(None);
        target.set_fragment(None);

        let path = target
            .as_str()
            .strip_prefix(&self.base)
            .map(str::to_string)
            .ok_or_else(|| {
                E2eError::NavigationFailed(format!("net::ERR_NAME_NOT_RESOLVED at {}", url))
            })?;

        let mut state = self.live_state().await?;
        state.pending = None;
        self.open(&mut state, &path);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.live_state().await?;
        match &state.page {
            Some(path) => Ok(Url::parse(&self.base)?.join(path)?.to_string()),
            None => Ok("about:blank".to_string()),
        }
    }

    async fn probe(&self, selector: &Selector) -> Result<ElementProbe> {
        let state = self.live_state().await?;
        let doc = Document::parse(&self.render(&state));
        doc.probe(selector)
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        let mut state = self.live_state().await?;
        let target = self.target(&state, selector)?;
        state.clicks.push(target.label());
        self.activate(&mut state, &target);
        Ok(())
    }

    async fn set_value(&self, selector: &Selector, text: &str) -> Result<()> {
        let mut state = self.live_state().await?;
        let key = self.editable_key(&state, selector)?;
        state.inputs.insert(key, text.to_string());
        Ok(())
    }

    async fn type_char(&self, selector: &Selector, ch: char) -> Result<()> {
        let mut state = self.live_state().await?;
        let key = self.editable_key(&state, selector)?;
        state.inputs.entry(key.clone()).or_default().push(ch);
        state.keystrokes.push(Keystroke {
            field: key,
            ch,
            at: Instant::now(),
        });
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.live_state().await?;
        general_purpose::STANDARD
            .decode(BLANK_PNG)
            .map_err(|e| E2eError::ScreenshotFailed(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().await.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_test(id: &str) -> Selector {
        Selector::css(format!("[data-test='{}']", id))
    }

    async fn logged_in(store: &FakeStorefront, user: &str) {
        store.goto(DEFAULT_BASE_URL).await.unwrap();
        store.set_value(&by_test("username"), user).await.unwrap();
        store.set_value(&by_test("password"), PASSWORD).await.unwrap();
        store.click(&by_test("login-button")).await.unwrap();
    }

    #[test]
    fn slugs_follow_the_storefront_ids() {
        let catalog = default_catalog();
        assert_eq!(catalog[2].slug(), "sauce-labs-bolt-t-shirt");
        assert_eq!(catalog[5].slug(), "test-allthethings-t-shirt-red");
        assert_eq!(format_price(799), "$7.99");
    }

    #[tokio::test]
    async fn starts_blank_and_serves_login_at_root() {
        let store = FakeStorefront::new();
        assert_eq!(store.current_url().await.unwrap(), "about:blank");

        store.goto(DEFAULT_BASE_URL).await.unwrap();
        assert_eq!(store.current_url().await.unwrap(), DEFAULT_BASE_URL);
        let inputs = store.probe(&Selector::css("input")).await.unwrap();
        assert_eq!(inputs.count, 3);
    }

    #[tokio::test]
    async fn foreign_hosts_fail_navigation() {
        let store = FakeStorefront::new();
        let err = store.goto("https://example.invalid/").await.unwrap_err();
        assert!(matches!(err, E2eError::NavigationFailed(_)));
    }

    #[tokio::test]
    async fn protected_pages_redirect_to_login() {
        let store = FakeStorefront::new();
        store
            .goto("https://www.saucedemo.com/inventory.html")
            .await
            .unwrap();

        assert_eq!(store.current_url().await.unwrap(), DEFAULT_BASE_URL);
        assert!(store.html().await.contains("when you are logged in"));
    }

    #[tokio::test]
    async fn locked_out_user_stays_on_login() {
        let store = FakeStorefront::new();
        logged_in(&store, LOCKED_OUT_USER).await;

        assert!(store.logged_in_user().await.is_none());
        let error = store.probe(&by_test("error")).await.unwrap();
        assert_eq!(
            error.text.as_deref(),
            Some("Epic sadface: Sorry, this user has been locked out.")
        );
    }

    #[tokio::test]
    async fn glitch_user_lands_after_the_delay() {
        let store = FakeStorefront::new().with_login_delay(Duration::from_millis(40));
        logged_in(&store, PERFORMANCE_GLITCH_USER).await;

        assert_eq!(store.current_url().await.unwrap(), DEFAULT_BASE_URL);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(
            store.current_url().await.unwrap(),
            "https://www.saucedemo.com/inventory.html"
        );
    }

    #[tokio::test]
    async fn cart_buttons_toggle_and_badge_counts() {
        let store = FakeStorefront::new();
        logged_in(&store, STANDARD_USER).await;

        store.click(&by_test("add-to-cart-sauce-labs-onesie")).await.unwrap();
        store.click(&by_test("add-to-cart-sauce-labs-backpack")).await.unwrap();
        let badge = store.probe(&by_test("shopping-cart-badge")).await.unwrap();
        assert_eq!(badge.text.as_deref(), Some("2"));

        store.click(&by_test("remove-sauce-labs-onesie")).await.unwrap();
        assert_eq!(store.cart_items().await, vec!["Sauce Labs Backpack"]);
    }

    #[tokio::test]
    async fn typing_appends_and_fill_replaces() {
        let store = FakeStorefront::new();
        store.goto(DEFAULT_BASE_URL).await.unwrap();

        store.set_value(&by_test("username"), "someone").await.unwrap();
        store.set_value(&by_test("username"), "std").await.unwrap();
        for ch in "_user".chars() {
            store.type_char(&by_test("username"), ch).await.unwrap();
        }

        assert_eq!(store.input_value("username").await.as_deref(), Some("std_user"));
        assert_eq!(store.keystrokes().await.len(), 5);
    }

    #[tokio::test]
    async fn header_links_are_in_page_anchors() {
        let store = FakeStorefront::new();
        logged_in(&store, STANDARD_USER).await;

        let html = store.html().await;
        assert!(html.contains(r##"data-test="shopping-cart-link" href="#""##));
        assert!(html.contains(r##"data-test="logout-sidebar-link" href="#">Logout</a>"##));
        assert!(html.contains(r##"<a href="#" id="item_0_title_link""##));

        let cart = store.probe(&by_test("shopping-cart-link")).await.unwrap();
        assert_eq!(cart.count, 1);
        assert!(cart.visible);
    }

    #[tokio::test]
    async fn base_url_without_trailing_slash_serves_beneath_it() {
        let store = FakeStorefront::new()
            .with_base_url("http://localhost:8080/shop")
            .unwrap();
        store.goto("http://localhost:8080/shop/").await.unwrap();
        store.set_value(&by_test("username"), STANDARD_USER).await.unwrap();
        store.set_value(&by_test("password"), PASSWORD).await.unwrap();
        store.click(&by_test("login-button")).await.unwrap();

        assert_eq!(
            store.current_url().await.unwrap(),
            "http://localhost:8080/shop/inventory.html"
        );
    }

    #[tokio::test]
    async fn closed_store_rejects_calls() {
        let store = FakeStorefront::new();
        store.close().await.unwrap();
        assert!(store.goto(DEFAULT_BASE_URL).await.is_err());
    }
}
