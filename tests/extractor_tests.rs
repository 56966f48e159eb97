mod common;

use common::*;
use ui_test_synth::config::limits::{AnalysisLimits, Profile};
use ui_test_synth::feature::extractor::extract_features;
use ui_test_synth::feature::feature_model::{FeatureAttributes, FeatureKind, FeatureSubtype};
use ui_test_synth::screen::screen_model::{DomElement, PageSnapshot};

const PAGE: &str = "https://shop.test/products";

fn of_kind(
    features: &[ui_test_synth::feature::feature_model::Feature],
    kind: FeatureKind,
) -> usize {
    features.iter().filter(|f| f.kind == kind).count()
}

// ============================================================================
// Forms
// ============================================================================

#[test]
fn form_collects_fields_and_submit_label() {
    let snap = snapshot(
        PAGE,
        vec![
            form("signup"),
            form_input("signup", "email", "email"),
            form_input("signup", "csrf", "hidden"),
            form_input("signup", "password", "password"),
            form_submit("signup", "Create account"),
        ],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    let forms: Vec<_> = features.iter().filter(|f| f.kind == FeatureKind::Form).collect();
    assert_eq!(forms.len(), 1);

    let f = forms[0];
    assert_eq!(f.fields().len(), 2, "hidden input is not a field");
    assert_eq!(f.submit_label(), Some("Create account"));
    assert_eq!(f.display_text(), "signup");
    assert!(f.subtype.is_none(), "extraction does not classify");
}

#[test]
fn form_submit_button_not_extracted_as_standalone_button() {
    let snap = snapshot(
        PAGE,
        vec![
            form("f"),
            form_input("f", "q", "text"),
            form_submit("f", "Go"),
            button("Add to Cart"),
        ],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    let buttons: Vec<_> = features
        .iter()
        .filter(|f| f.kind == FeatureKind::Button)
        .map(|f| f.display_text())
        .collect();
    assert_eq!(buttons, vec!["Add to Cart".to_string()]);
}

#[test]
fn form_without_fields_dropped() {
    let snap = snapshot(PAGE, vec![form("empty"), form_submit("empty", "Go")]);
    let features = extract_features(&snap, &AnalysisLimits::default());
    assert_eq!(of_kind(&features, FeatureKind::Form), 0);
}

#[test]
fn virtual_login_form_from_bare_inputs() {
    let snap = snapshot(
        "https://app.test/",
        vec![
            bare_input("email", "email"),
            bare_input("password", "password"),
            button("Sign in"),
        ],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    let form = features
        .iter()
        .find(|f| f.kind == FeatureKind::Form)
        .expect("virtual form");

    assert_eq!(form.subtype, Some(FeatureSubtype::Login));
    assert!(matches!(
        form.attributes,
        FeatureAttributes::Form { is_virtual: true, .. }
    ));
}

#[test]
fn bare_inputs_without_password_no_virtual_form() {
    let snap = snapshot(
        PAGE,
        vec![bare_input("email", "email"), bare_input("name", "text")],
    );
    let features = extract_features(&snap, &AnalysisLimits::default());
    assert_eq!(of_kind(&features, FeatureKind::Form), 0);
}

#[test]
fn form_cap_respected() {
    let mut dom = Vec::new();
    for i in 0..8 {
        let id = format!("f{}", i);
        dom.push(form(&id));
        dom.push(form_input(&id, "comment", "text"));
    }
    let snap = snapshot(PAGE, dom);

    let limits = AnalysisLimits::default();
    let features = extract_features(&snap, &limits);
    assert_eq!(of_kind(&features, FeatureKind::Form), limits.max_forms);
}

// ============================================================================
// Buttons and caps
// ============================================================================

#[test]
fn fifty_buttons_capped_in_document_order() {
    let dom: Vec<DomElement> = (0..50).map(|i| button(&format!("Button {}", i))).collect();
    let snap = snapshot(PAGE, dom);

    let quick = extract_features(&snap, &AnalysisLimits::for_profile(Profile::Quick));
    let buttons: Vec<String> = quick
        .iter()
        .filter(|f| f.kind == FeatureKind::Button)
        .map(|f| f.display_text())
        .collect();
    assert_eq!(buttons.len(), 10);
    assert_eq!(buttons[0], "Button 0");
    assert_eq!(buttons[9], "Button 9");

    let thorough = extract_features(&snap, &AnalysisLimits::for_profile(Profile::Thorough));
    assert_eq!(of_kind(&thorough, FeatureKind::Button), 30);
}

#[test]
fn disabled_and_textless_buttons_skipped() {
    let mut disabled = button("Delete");
    disabled.disabled = true;
    let snap = snapshot(PAGE, vec![disabled, button("   "), button("Edit")]);

    let features = extract_features(&snap, &AnalysisLimits::default());
    let texts: Vec<String> = features.iter().map(|f| f.display_text()).collect();
    assert_eq!(texts, vec!["Edit".to_string()]);
}

#[test]
fn button_text_prefers_aria_label() {
    let mut icon = button("");
    icon.aria_label = Some("Add item".into());
    let snap = snapshot(PAGE, vec![icon]);

    let features = extract_features(&snap, &AnalysisLimits::default());
    assert_eq!(features[0].display_text(), "Add item");
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn relative_links_resolved_against_page() {
    let snap = snapshot(
        PAGE,
        vec![
            link("About", "/about"),
            link("Run", "javascript:void(0)"),
            link("", "/empty"),
        ],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    assert_eq!(features.len(), 1);
    match &features[0].attributes {
        FeatureAttributes::Link { text, href } => {
            assert_eq!(text, "About");
            assert_eq!(href, "https://shop.test/about");
        }
        other => panic!("expected link, got {:?}", other),
    }
}

#[test]
fn dot_segments_and_query_only_pages_resolve_cleanly() {
    let nested = snapshot("https://shop.test/a/b/c", vec![link("Up", "../x")]);
    let features = extract_features(&nested, &AnalysisLimits::default());
    match &features[0].attributes {
        FeatureAttributes::Link { href, .. } => assert_eq!(href, "https://shop.test/a/x"),
        other => panic!("expected link, got {:?}", other),
    }

    let landing = snapshot("https://shop.test?ref=1", vec![link("Cart", "/cart")]);
    let features = extract_features(&landing, &AnalysisLimits::default());
    match &features[0].attributes {
        FeatureAttributes::Link { href, .. } => assert_eq!(href, "https://shop.test/cart"),
        other => panic!("expected link, got {:?}", other),
    }
}

// ============================================================================
// Tables, navigation, modals
// ============================================================================

#[test]
fn table_navigation_and_modal_extracted() {
    let snap = snapshot(
        PAGE,
        vec![
            table(&["Name", "Price"], 4),
            nav(&[("Home", "/"), ("Cart", "/cart")]),
            dialog("Confirm purchase"),
        ],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    assert_eq!(of_kind(&features, FeatureKind::Table), 1);
    assert_eq!(of_kind(&features, FeatureKind::Navigation), 1);
    assert_eq!(of_kind(&features, FeatureKind::Modal), 1);

    let nav = features.iter().find(|f| f.kind == FeatureKind::Navigation).unwrap();
    assert!(nav.is_global, "a <nav> is page chrome");
}

#[test]
fn malformed_elements_skipped_rest_extracted() {
    let snap = snapshot(
        PAGE,
        vec![el(""), table(&[], 0), button("Export")],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].kind, FeatureKind::Button);
}

// ============================================================================
// Region detection
// ============================================================================

#[test]
fn header_elements_flagged_global() {
    let snap = snapshot(
        PAGE,
        vec![
            in_header(link("Account", "/account")),
            in_div(link("Details", "/p/1"), "card-header"),
            in_div(link("Help", "/help"), "site-footer"),
        ],
    );

    let features = extract_features(&snap, &AnalysisLimits::default());
    let global: Vec<(String, bool)> = features
        .iter()
        .map(|f| (f.display_text(), f.is_global))
        .collect();

    assert_eq!(
        global,
        vec![
            ("Account".to_string(), true),
            ("Details".to_string(), false),
            ("Help".to_string(), true),
        ]
    );
}

// ============================================================================
// Snapshot parsing
// ============================================================================

#[test]
fn snapshot_skips_undecodable_entries() {
    let raw = serde_json::json!({
        "url": PAGE,
        "title": "Products",
        "dom": [
            { "tag": "button", "text": "Add to Cart" },
            { "tag": 42 },
            { "tag": "a", "text": "Home", "href": "/" }
        ]
    });

    let snap = PageSnapshot::from_value(&raw).unwrap();
    assert_eq!(snap.dom.len(), 2);
    assert_eq!(snap.title, "Products");
}

#[test]
fn snapshot_without_dom_rejected() {
    let raw = serde_json::json!({ "url": PAGE });
    assert!(PageSnapshot::from_value(&raw).is_none());
}
