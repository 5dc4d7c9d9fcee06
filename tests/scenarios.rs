use std::path::Path;
use std::time::Duration;
use storefront_e2e::core::{ArtifactConfig, ScreenshotMode};
use storefront_e2e::pages::TitledPage;
use storefront_e2e::scenarios::data::DEFAULT_NEGATIVE_LOGINS;
use storefront_e2e::scenarios::flows::{self, LOGIN_USERS};
use storefront_e2e::scenarios::{
    self, load_negative_logins, NegativeLoginCase, Outcome, PageSet, Scenario, ScenarioKind,
};
use storefront_e2e::testing::{FakeStorefront, TestHelper};
use storefront_e2e::utils::ArtifactRecorder;

fn recorder(dir: &Path, screenshots: ScreenshotMode) -> ArtifactRecorder {
    ArtifactRecorder::new(ArtifactConfig {
        dir: dir.to_path_buf(),
        screenshots,
        write_reports: true,
    })
    .unwrap()
}

#[tokio::test]
async fn full_checkout_completes_and_logs_out() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, session) = TestHelper::fake_session().unwrap();

    let report = scenarios::run(
        &ScenarioKind::FullCheckout,
        &session,
        &recorder(tmp.path(), ScreenshotMode::OnFailure),
    )
    .await;

    assert!(report.passed(), "{:?}", report.error);
    assert!(report.steps.iter().all(|s| s.outcome == Outcome::Passed));
    assert_eq!(report.steps[0].label, "Login with username: 'standard_user'");
    assert_eq!(
        report.steps.last().map(|s| s.label.as_str()),
        Some("Verify successful logout")
    );

    let info = store.checkout_info().await.unwrap();
    assert_eq!(
        (info.first_name.as_str(), info.last_name.as_str(), info.postal_code.as_str()),
        ("Alex", "Komanov", "20100")
    );
    assert!(store.cart_items().await.is_empty());
    assert!(store.logged_in_user().await.is_none());
}

#[tokio::test]
async fn checkout_steps_can_be_driven_directly() {
    let (_store, session) = TestHelper::fake_session().unwrap();
    let pages = PageSet::new(&session);
    let mut scenario = Scenario::new("direct");

    flows::perform_login(&mut scenario, &pages.login, "standard_user", "secret_sauce")
        .await
        .unwrap();
    flows::add_items_to_cart(&mut scenario, &pages.items, &flows::CHECKOUT_ITEMS)
        .await
        .unwrap();

    pages.items.validate_page_title_text("Products").await.unwrap();
    pages
        .items
        .validate_added_items_amount(flows::CHECKOUT_ITEMS.len())
        .await
        .unwrap();

    let summary = &scenario.steps()[1].attachments[0];
    assert_eq!(summary.name, "Cart Summary");
    assert_eq!(summary.body, "Added 5 items");
}

#[tokio::test]
async fn express_checkout_uses_the_shared_flows() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, session) = TestHelper::fake_session().unwrap();

    let report = scenarios::run(
        &ScenarioKind::ExpressCheckout,
        &session,
        &recorder(tmp.path(), ScreenshotMode::Off),
    )
    .await;

    assert!(report.passed(), "{:?}", report.error);
    let customer = report
        .steps
        .iter()
        .flat_map(|s| &s.attachments)
        .find(|a| a.name == "Customer Information")
        .unwrap();
    assert_eq!(customer.body, "Name: John Smith\nPostal Code: 90210");
    assert!(store.logged_in_user().await.is_none());
}

#[tokio::test]
async fn every_accepted_user_reaches_the_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let recorder = recorder(tmp.path(), ScreenshotMode::Off);

    for user in LOGIN_USERS {
        let store = FakeStorefront::new().with_login_delay(Duration::from_millis(50));
        let (_store, session) =
            TestHelper::fake_session_with(store, TestHelper::fast_config()).unwrap();

        let report =
            scenarios::run(&ScenarioKind::LoginAs(user.to_string()), &session, &recorder).await;
        assert!(report.passed(), "{user}: {:?}", report.error);
    }
}

#[tokio::test]
async fn shipped_negative_logins_all_pass() {
    let tmp = tempfile::tempdir().unwrap();
    let recorder = recorder(tmp.path(), ScreenshotMode::OnFailure);
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_NEGATIVE_LOGINS);

    for case in load_negative_logins(data).unwrap() {
        let (_store, session) = TestHelper::fake_session().unwrap();
        let report = scenarios::run(&ScenarioKind::NegativeLogin(case.clone()), &session, &recorder)
            .await;
        assert!(report.passed(), "{case:?}: {:?}", report.error);
        assert_eq!(report.steps.len(), 4);
    }
}

#[tokio::test]
async fn wrong_expectation_fails_with_screenshot_and_report() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, session) = TestHelper::fake_session().unwrap();
    let case = NegativeLoginCase {
        username: "locked_out_user".into(),
        password: "secret_sauce".into(),
        error_message: "Epic sadface: Welcome back".into(),
    };

    let report = scenarios::run(
        &ScenarioKind::NegativeLogin(case),
        &session,
        &recorder(tmp.path(), ScreenshotMode::OnFailure),
    )
    .await;

    assert_eq!(report.outcome, Outcome::Failed);
    let failed = report.steps.last().unwrap();
    assert_eq!(failed.label, "Verify error message: 'Epic sadface: Welcome back'");
    assert!(failed.error.as_deref().unwrap().contains("Welcome back"));
    assert_eq!(report.attachments[0].content_type, "image/png");
    assert!(store.logged_in_user().await.is_none());

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names
        .iter()
        .any(|n| n.starts_with("negative_login_locked_out_user") && n.ends_with(".json")));
    assert!(names.iter().any(|n| n.ends_with(".png")));
}

#[tokio::test]
async fn checkout_form_validation_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let (_store, session) = TestHelper::fake_session().unwrap();

    let report = scenarios::run(
        &ScenarioKind::CheckoutRequiresInfo,
        &session,
        &recorder(tmp.path(), ScreenshotMode::Off),
    )
    .await;

    assert!(report.passed(), "{:?}", report.error);
}

#[tokio::test]
#[ignore = "needs a local Chrome and network access to the public storefront"]
async fn full_checkout_against_live_storefront() {
    let tmp = tempfile::tempdir().unwrap();
    let session = TestHelper::create_test_browser().unwrap();

    let report = scenarios::run(
        &ScenarioKind::FullCheckout,
        &session,
        &recorder(tmp.path(), ScreenshotMode::OnFailure),
    )
    .await;
    session.close().await.unwrap();

    assert!(report.passed(), "{:?}", report.error);
}
