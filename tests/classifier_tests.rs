mod common;

use common::*;
use ui_test_synth::feature::classifier::{
    BUTTON_RULES, FORM_RULES, Signals, classify, classify_all, classify_button_text,
    classify_form_text, form_signal_text,
};
use ui_test_synth::feature::feature_model::{
    Feature, FeatureAttributes, FeatureKind, FeatureSubtype, Field,
};

const PAGE: &str = "https://app.test/";

fn unclassified_form(fields: Vec<Field>) -> Feature {
    Feature::observed(
        FeatureKind::Form,
        FeatureAttributes::Form {
            title: None,
            role: None,
            fields,
            submit_label: None,
            is_virtual: false,
        },
        PAGE,
        false,
    )
}

// ============================================================================
// Form rules
// ============================================================================

#[test]
fn email_password_is_login() {
    assert_eq!(classify_form_text("email password"), FeatureSubtype::Login);
    assert_eq!(classify_form_text("username password"), FeatureSubtype::Login);
}

#[test]
fn email_password_confirm_is_not_login() {
    assert_eq!(
        classify_form_text("email password confirm"),
        FeatureSubtype::Registration
    );
    assert_eq!(
        classify_form_text("user password confirm"),
        FeatureSubtype::DataEntry,
        "no registration signal falls through to data-entry"
    );
}

#[test]
fn search_form_variants() {
    assert_eq!(classify_form_text("search"), FeatureSubtype::Search);
    assert_eq!(classify_form_text("query"), FeatureSubtype::Search);
    assert_eq!(classify_form_text("q"), FeatureSubtype::Search);
    assert_eq!(
        classify_form_text("quantity"),
        FeatureSubtype::DataEntry,
        "bare q only as a whole token"
    );
}

#[test]
fn other_form_subtypes() {
    assert_eq!(classify_form_text("card number cvv"), FeatureSubtype::Payment);
    assert_eq!(classify_form_text("register now"), FeatureSubtype::Registration);
    assert_eq!(classify_form_text("your message"), FeatureSubtype::Feedback);
    assert_eq!(classify_form_text("first name last name"), FeatureSubtype::DataEntry);
}

#[test]
fn form_rules_evaluated_in_order() {
    let order: Vec<FeatureSubtype> = FORM_RULES.iter().map(|r| r.subtype).collect();
    assert_eq!(
        order,
        vec![
            FeatureSubtype::Login,
            FeatureSubtype::Search,
            FeatureSubtype::Payment,
            FeatureSubtype::Registration,
            FeatureSubtype::Feedback,
        ]
    );

    // login wins over feedback when both match
    let signals = Signals::new("user password message");
    let first = FORM_RULES.iter().find(|r| (r.matches)(&signals)).unwrap();
    assert_eq!(first.subtype, FeatureSubtype::Login);
}

// ============================================================================
// Button rules
// ============================================================================

#[test]
fn button_keywords() {
    assert_eq!(classify_button_text("Add to Cart"), FeatureSubtype::Create);
    assert_eq!(classify_button_text("New project"), FeatureSubtype::Create);
    assert_eq!(classify_button_text("Edit profile"), FeatureSubtype::Update);
    assert_eq!(classify_button_text("Remove"), FeatureSubtype::Delete);
    assert_eq!(classify_button_text("Download CSV"), FeatureSubtype::Export);
    assert_eq!(classify_button_text("Sort by price"), FeatureSubtype::Filter);
    assert_eq!(classify_button_text("Learn more"), FeatureSubtype::Action);
}

#[test]
fn button_keywords_match_whole_words() {
    assert_eq!(classify_button_text("Address book"), FeatureSubtype::Action);
    assert_eq!(classify_button_text("News"), FeatureSubtype::Action);
    assert_eq!(classify_button_text("Credited"), FeatureSubtype::Action);
}

#[test]
fn button_rules_cover_crud_first() {
    let crud: Vec<bool> = BUTTON_RULES.iter().take(3).map(|r| r.subtype.is_crud()).collect();
    assert_eq!(crud, vec![true, true, true]);
}

// ============================================================================
// Feature classification
// ============================================================================

#[test]
fn signal_text_includes_telling_types() {
    let f = unclassified_form(vec![field("login_id", "email"), field("secret", "password")]);
    let text = form_signal_text(&f);
    assert!(text.contains("email"));
    assert!(text.contains("password"));

    let f = classify(f);
    assert_eq!(f.subtype, Some(FeatureSubtype::Login));
}

#[test]
fn search_role_classifies_form() {
    let mut f = unclassified_form(vec![field("term", "text")]);
    if let FeatureAttributes::Form { role, .. } = &mut f.attributes {
        *role = Some("search".into());
    }
    assert_eq!(classify(f).subtype, Some(FeatureSubtype::Search));
}

#[test]
fn preset_subtype_is_kept() {
    let f = unclassified_form(vec![field("comment", "text")]).with_subtype(FeatureSubtype::Login);
    assert_eq!(classify(f).subtype, Some(FeatureSubtype::Login));
}

#[test]
fn non_form_non_button_kinds_stay_unclassified() {
    let features = classify_all(vec![
        link_feature(PAGE, "Add", "https://app.test/add", false),
        table_feature(PAGE, &["Name"]),
        button_feature(PAGE, "Delete", FeatureSubtype::Delete),
    ]);

    assert_eq!(features[0].subtype, None);
    assert_eq!(features[1].subtype, None);
    assert_eq!(features[2].subtype, Some(FeatureSubtype::Delete));
}

#[test]
fn classification_is_deterministic() {
    let make = || unclassified_form(vec![field("email", "email"), field("password", "password")]);
    let a = classify(make());
    let b = classify(make());
    assert_eq!(a, b);
}
