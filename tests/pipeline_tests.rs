mod common;

use common::*;
use ui_test_synth::analysis::error::AnalysisError;
use ui_test_synth::analysis::pipeline::{AnalysisOptions, Analyzer, analyze_snapshots};
use ui_test_synth::analysis::request::{AnalysisRequest, AnalysisResponse};
use ui_test_synth::browser::snapshot_driver::{RecordedAction, SelectorState, SnapshotDriver};
use ui_test_synth::config::limits::AnalysisLimits;
use ui_test_synth::feature::feature_model::FeatureKind;
use ui_test_synth::login::login_model::{LoginConfig, LoginNavigationPolicy};
use ui_test_synth::screen::screen_model::PageSnapshot;
use ui_test_synth::synth::test_case::Scope;

const PRODUCTS: &str = "https://shop.test/products";
const CART: &str = "https://shop.test/cart";
const LOGIN: &str = "https://shop.test/login";

fn analyzer() -> Analyzer {
    Analyzer::new(
        AnalysisLimits::default(),
        AnalysisOptions {
            page_settle_ms: 0,
            login_settle_ms: 0,
            ..AnalysisOptions::default()
        },
    )
}

fn products_page() -> PageSnapshot {
    snapshot(
        PRODUCTS,
        vec![
            in_header(link("Account", "/account")),
            form("search"),
            form_input("search", "q", "search"),
            form_submit("search", "Search"),
            button("Add to Cart"),
        ],
    )
}

fn cart_page() -> PageSnapshot {
    snapshot(
        CART,
        vec![
            in_header(link("Account", "/account")),
            table(&["Item", "Qty", "Price"], 2),
            button("Remove"),
        ],
    )
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn single_page_search_form_and_add_to_cart() {
    let mut driver = SnapshotDriver::new().with_page(products_page());
    let response = analyzer().analyze(&AnalysisRequest::for_url(PRODUCTS), &mut driver);

    assert!(response.success);
    assert_eq!(response.pages_analyzed, 1);
    assert_eq!(response.login_success, None);

    let search = response
        .tests
        .iter()
        .find(|t| t.title.starts_with("Search Form"))
        .expect("search form case");
    assert_eq!(search.category, "Search");

    let add = response
        .tests
        .iter()
        .find(|t| t.title.contains("\"Add to Cart\""))
        .expect("add to cart case");
    assert_eq!(add.category, "create");
}

#[test]
fn multi_page_dedups_shared_header_link() {
    let mut driver = SnapshotDriver::new().with_page(products_page()).with_page(cart_page());
    let request = AnalysisRequest {
        urls: vec![PRODUCTS.into(), CART.into()],
        ..Default::default()
    };

    let response = analyzer().analyze(&request, &mut driver);
    assert!(response.success);
    assert_eq!(response.pages_analyzed, 2);

    let account: Vec<_> = response
        .tests
        .iter()
        .filter(|t| t.title.starts_with("Link \"Account\""))
        .collect();
    assert_eq!(account.len(), 1);
    assert_eq!(account[0].scope, Scope::Global);
    assert_eq!(account[0].affected_pages, vec![PRODUCTS.to_string(), CART.to_string()]);

    let ids: Vec<String> = (1..=response.tests.len()).map(|i| format!("TC-{:03}", i)).collect();
    let actual: Vec<String> = response.tests.iter().map(|t| t.id.clone()).collect();
    assert_eq!(actual, ids);
}

#[test]
fn pages_visited_sequentially_in_request_order() {
    let mut driver = SnapshotDriver::new().with_page(products_page()).with_page(cart_page());
    let request = AnalysisRequest {
        url: Some(CART.into()),
        pages: vec![PRODUCTS.into(), CART.into()],
        ..Default::default()
    };

    analyzer().analyze(&request, &mut driver);

    let visited: Vec<&RecordedAction> = driver
        .actions
        .iter()
        .filter(|a| matches!(a, RecordedAction::Navigate(_)))
        .collect();
    assert_eq!(
        visited,
        vec![
            &RecordedAction::Navigate(CART.into()),
            &RecordedAction::Navigate(PRODUCTS.into())
        ]
    );
}

// ============================================================================
// Recovered and fatal errors
// ============================================================================

#[test]
fn failed_page_skipped_others_analyzed() {
    let mut driver = SnapshotDriver::new()
        .with_page(products_page())
        .with_failing_page(CART);
    let request = AnalysisRequest {
        urls: vec![CART.into(), PRODUCTS.into()],
        ..Default::default()
    };

    let response = analyzer().analyze(&request, &mut driver);
    assert!(response.success);
    assert_eq!(response.pages_analyzed, 1);
    assert!(!response.tests.is_empty());
}

#[test]
fn all_pages_failing_is_navigation_failure() {
    let mut driver = SnapshotDriver::new().with_failing_page(PRODUCTS);
    let response = analyzer().analyze(&AnalysisRequest::for_url(PRODUCTS), &mut driver);

    assert!(!response.success);
    assert!(response.tests.is_empty());
    assert_eq!(response.debug.as_ref().unwrap()["kind"], "navigation");
}

#[test]
fn no_url_rejected_before_any_navigation() {
    let mut driver = SnapshotDriver::new().with_page(products_page());
    let response = analyzer().analyze(&AnalysisRequest::default(), &mut driver);

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("invalid request: no URL provided"));
    assert!(driver.actions.is_empty());
}

#[test]
fn empty_page_reports_nothing_found() {
    let mut driver = SnapshotDriver::new().with_page(snapshot(PRODUCTS, vec![el("div")]));
    let response = analyzer().analyze(&AnalysisRequest::for_url(PRODUCTS), &mut driver);

    assert!(!response.success);
    assert_eq!(response.pages_analyzed, 1);
    assert!(response.tests.is_empty());
    assert!(response.message.unwrap().contains("no features detected"));
}

#[test]
fn exceeded_deadline_fails_whole_request() {
    let analyzer = Analyzer::new(
        AnalysisLimits::default(),
        AnalysisOptions {
            timeout_secs: 0,
            ..AnalysisOptions::default()
        },
    );
    let mut driver = SnapshotDriver::new().with_page(products_page());
    let response = analyzer.analyze(&AnalysisRequest::for_url(PRODUCTS), &mut driver);

    assert!(!response.success);
    assert!(response.tests.is_empty(), "no partial result on timeout");
    assert_eq!(response.debug.unwrap()["kind"], "timeout");
}

// ============================================================================
// Login
// ============================================================================

fn login_driver(after_submit_url: Option<&str>, password_remains: bool) -> SnapshotDriver {
    let login_form = SelectorState::default()
        .with_element(r#"input[name="email"]"#)
        .with_element(r#"input[type="password"]"#)
        .with_element(r#"button[type="submit"]"#);
    let after = if password_remains {
        SelectorState::default().with_element(r#"input[type="password"]"#)
    } else {
        SelectorState::default()
    };

    SnapshotDriver::new()
        .with_page(snapshot(LOGIN, vec![]))
        .with_page(products_page())
        .with_selectors(login_form)
        .with_after_submit(after, after_submit_url)
}

#[test]
fn successful_login_marks_cases_logged_in() {
    let mut driver = login_driver(Some(PRODUCTS), false);
    let request = AnalysisRequest::for_url(PRODUCTS)
        .with_login(LoginConfig::new(LOGIN, "qa@shop.test", "pw"));

    let response = analyzer().analyze(&request, &mut driver);

    assert!(response.success);
    assert_eq!(response.login_success, Some(true));
    assert!(response
        .tests
        .iter()
        .all(|t| t.preconditions.first().map(String::as_str) == Some("User is logged in")));
}

#[test]
fn rejected_login_short_circuits_with_zero_cases() {
    let mut driver = login_driver(None, true);
    let request = AnalysisRequest::for_url(PRODUCTS)
        .with_login(LoginConfig::new(LOGIN, "qa@shop.test", "wrong"));

    let response = analyzer().analyze(&request, &mut driver);

    assert!(!response.success);
    assert!(response.tests.is_empty());
    assert_eq!(response.login_success, Some(false));
    assert_eq!(response.pages_analyzed, 0);
    assert!(
        !driver.actions.contains(&RecordedAction::Navigate(PRODUCTS.into())),
        "no page is analyzed after a failed login"
    );
}

#[test]
fn login_page_down_aborts_by_default() {
    let mut driver = SnapshotDriver::new()
        .with_page(products_page())
        .with_failing_page(LOGIN);
    let request = AnalysisRequest::for_url(PRODUCTS)
        .with_login(LoginConfig::new(LOGIN, "qa@shop.test", "pw"));

    let response = analyzer().analyze(&request, &mut driver);
    assert!(!response.success);
    assert_eq!(response.debug.unwrap()["kind"], "login");
}

#[test]
fn login_page_down_can_proceed_unauthenticated() {
    let analyzer = Analyzer::new(
        AnalysisLimits::default(),
        AnalysisOptions {
            page_settle_ms: 0,
            login_settle_ms: 0,
            on_login_navigation_failure: LoginNavigationPolicy::ProceedUnauthenticated,
            ..AnalysisOptions::default()
        },
    );
    let mut driver = SnapshotDriver::new()
        .with_page(products_page())
        .with_failing_page(LOGIN);
    let request = AnalysisRequest::for_url(PRODUCTS)
        .with_login(LoginConfig::new(LOGIN, "qa@shop.test", "pw"));

    let response = analyzer.analyze(&request, &mut driver);
    assert!(response.success);
    assert_eq!(response.login_success, Some(false));
    assert!(response
        .tests
        .iter()
        .all(|t| t.preconditions.first().map(String::as_str) != Some("User is logged in")));
}

// ============================================================================
// Request / response payloads
// ============================================================================

#[test]
fn request_target_urls_merge_and_dedup() {
    let request: AnalysisRequest = serde_json::from_str(
        r#"{"url": "https://a.test/", "urls": ["https://b.test/", " "], "pages": ["https://a.test/"]}"#,
    )
    .unwrap();
    assert_eq!(request.target_urls(), vec!["https://a.test/", "https://b.test/"]);
}

#[test]
fn login_without_credentials_is_input_error() {
    let request = AnalysisRequest::for_url(PRODUCTS).with_login(LoginConfig {
        login_url: LOGIN.into(),
        ..Default::default()
    });
    assert!(matches!(request.validate(), Err(AnalysisError::Input(_))));
}

#[test]
fn failure_response_has_message_and_no_tests() {
    let response = AnalysisResponse::failed(&AnalysisError::EmptyResult { pages: 2 }, 2, None);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["tests"], serde_json::json!([]));
    assert_eq!(json["pagesAnalyzed"], 2);
    assert_eq!(json["message"], "no features detected on 2 analyzed page(s)");
    assert!(json.get("loginSuccess").is_none());
}

#[test]
fn offline_snapshots_reconcile_like_live_pages() {
    let features = analyze_snapshots(&[products_page(), cart_page()], &AnalysisLimits::default());

    let links: Vec<_> = features.iter().filter(|f| f.kind == FeatureKind::Link).collect();
    assert_eq!(links.len(), 1);
    assert!(links[0].is_global);
    assert!(features.iter().all(|f| !f.fingerprint.is_empty()));
}

#[test]
fn only_request_problems_count_as_rejections() {
    assert!(AnalysisError::Input("no URL provided".into()).is_rejection());
    assert!(AnalysisError::Configuration("missing token".into()).is_rejection());
    assert!(!AnalysisError::Navigation("all 1 page(s) failed to load".into()).is_rejection());
    assert!(!AnalysisError::EmptyResult { pages: 1 }.is_rejection());
}
