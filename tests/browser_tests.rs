mod common;

use std::time::Duration;

use common::*;
use serde_json::json;
use ui_test_synth::browser::driver::{BrowserError, PageDriver};
use ui_test_synth::browser::protocol::{BrowserRequest, BrowserResponse};
use ui_test_synth::browser::remote::{RemoteBrowser, TOKEN_ENV};
use ui_test_synth::browser::snapshot_driver::{RecordedAction, SelectorState, SnapshotDriver};
use ui_test_synth::screen::screen_model::PageSnapshot;

// =========================================================================
// Wire protocol
// =========================================================================

#[test]
fn navigate_request_serializes_flat() {
    let value = serde_json::to_value(BrowserRequest::navigate("https://a.test/", 30_000)).unwrap();
    assert_eq!(
        value,
        json!({"cmd": "navigate", "url": "https://a.test/", "timeoutMs": 30000})
    );
}

#[test]
fn action_request_omits_unused_fields() {
    let value = serde_json::to_value(BrowserRequest::fill("#email", "qa@a.test")).unwrap();
    assert_eq!(
        value,
        json!({"cmd": "action", "action": "fill", "selector": "#email", "value": "qa@a.test"})
    );

    let value = serde_json::to_value(BrowserRequest::click_text("Sign in")).unwrap();
    assert_eq!(value, json!({"cmd": "action", "action": "click_text", "text": "Sign in"}));

    let value = serde_json::to_value(BrowserRequest::press_enter("#pw")).unwrap();
    assert_eq!(value["value"], "Enter");
}

#[test]
fn query_requests_carry_selector() {
    let value = serde_json::to_value(BrowserRequest::query_count("form")).unwrap();
    assert_eq!(value, json!({"cmd": "query_count", "selector": "form"}));
    assert_eq!(BrowserRequest::query_visible(".error").command_name(), "query_visible");
    assert_eq!(BrowserRequest::quit().command_name(), "quit");
}

#[test]
fn failed_response_becomes_protocol_error() {
    let response: BrowserResponse =
        serde_json::from_str(r#"{"ok": false, "error": "Timeout 30000ms exceeded"}"#).unwrap();

    match response.into_result("navigate") {
        Err(BrowserError::SessionProtocol { command, error }) => {
            assert_eq!(command, "navigate");
            assert_eq!(error, "Timeout 30000ms exceeded");
        }
        other => panic!("expected protocol error, got {:?}", other.map(|r| r.ok)),
    }
}

#[test]
fn ok_response_keeps_payload() {
    let response: BrowserResponse =
        serde_json::from_str(r#"{"ok": true, "count": 2, "sessionId": "s-1"}"#).unwrap();
    let response = response.into_result("query_count").unwrap();
    assert_eq!(response.count, Some(2));
    assert_eq!(response.session_id.as_deref(), Some("s-1"));
}

// =========================================================================
// Snapshot decoding
// =========================================================================

#[test]
fn snapshot_skips_undecodable_dom_entries() {
    let raw = json!({
        "url": "https://a.test/",
        "title": "A",
        "dom": [
            {"tag": "button", "text": "Save"},
            {"tag": 42},
            {"tag": "a", "text": "Home", "href": "/"}
        ]
    });

    let snapshot = PageSnapshot::from_value(&raw).unwrap();
    assert_eq!(snapshot.dom.len(), 2);
    assert_eq!(snapshot.title, "A");
}

#[test]
fn snapshot_without_dom_rejected() {
    assert!(PageSnapshot::from_value(&json!({"url": "https://a.test/"})).is_none());
}

// =========================================================================
// SnapshotDriver
// =========================================================================

#[test]
fn snapshot_driver_loads_directory() {
    let dir = scratch_dir("browser-snapshots");
    std::fs::write(
        dir.join("home.json"),
        r#"{"url": "https://a.test/", "dom": [{"tag": "button", "text": "Save"}]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("broken.json"), r#"{"url": "https://a.test/x"}"#).unwrap();
    std::fs::write(dir.join("notes.txt"), "not a snapshot").unwrap();

    let mut driver = SnapshotDriver::from_dir(&dir).unwrap();
    assert_eq!(driver.page_count(), 1);

    driver.navigate("https://a.test").unwrap();
    let snapshot = driver.snapshot().unwrap();
    assert_eq!(snapshot.dom.len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn snapshot_driver_missing_directory_errors() {
    let err = SnapshotDriver::from_dir(std::path::Path::new("/nonexistent/snapshots")).unwrap_err();
    assert!(matches!(err, BrowserError::SnapshotRead { .. }));
}

#[test]
fn snapshot_driver_unknown_and_failing_pages() {
    let mut driver = SnapshotDriver::new()
        .with_page(snapshot("https://a.test/", vec![]))
        .with_failing_page("https://a.test/down");

    assert!(matches!(
        driver.navigate("https://a.test/missing"),
        Err(BrowserError::UnknownPage(_))
    ));
    assert!(matches!(
        driver.navigate("https://a.test/down"),
        Err(BrowserError::NavigationFailed(_))
    ));
    assert!(driver.snapshot().is_err(), "nothing loaded yet");
}

#[test]
fn snapshot_driver_answers_selector_queries() {
    let state = SelectorState::default()
        .with_element("input")
        .with_element("input")
        .with_text(".error", "Wrong password")
        .with_clickable_text("Sign in");
    let mut driver = SnapshotDriver::new()
        .with_page(snapshot("https://a.test/login", vec![]))
        .with_selectors(state)
        .with_after_submit(SelectorState::default(), Some("https://a.test/home"));

    driver.navigate("https://a.test/login").unwrap();
    assert_eq!(driver.query_count("input").unwrap(), 2);
    assert!(driver.query_visible(".error").unwrap());
    assert_eq!(driver.query_text(".error").unwrap().as_deref(), Some("Wrong password"));

    assert!(!driver.click_text("Continue").unwrap());
    assert!(driver.click_text("Sign in").unwrap());
    assert_eq!(driver.current_url().unwrap(), "https://a.test/home");
    assert_eq!(driver.query_count("input").unwrap(), 0);

    assert_eq!(
        driver.actions,
        vec![
            RecordedAction::Navigate("https://a.test/login".into()),
            RecordedAction::ClickText("Sign in".into()),
        ]
    );
}

// =========================================================================
// RemoteBrowser
// =========================================================================

#[test]
fn remote_without_token_fails_before_connecting() {
    // Unroutable endpoint: reaching the network would fail differently.
    let result = RemoteBrowser::connect("http://127.0.0.1:9", None, Duration::from_secs(1), 1000);
    match result {
        Err(BrowserError::MissingCredential(name)) => assert_eq!(name, TOKEN_ENV),
        Err(e) => panic!("expected MissingCredential, got {}", e),
        Ok(_) => panic!("expected MissingCredential"),
    }

    let blank = RemoteBrowser::connect("http://127.0.0.1:9", Some("  "), Duration::from_secs(1), 1000);
    assert!(matches!(blank, Err(BrowserError::MissingCredential(_))));
}

#[test]
fn browser_errors_describe_themselves() {
    let err = BrowserError::SessionProtocol {
        command: "extract".into(),
        error: "page crashed".into(),
    };
    assert_eq!(err.to_string(), "browser command 'extract' failed: page crashed");
    assert_eq!(
        BrowserError::NavigationFailed("https://a.test/".into()).to_string(),
        "navigation to https://a.test/ failed"
    );
}
