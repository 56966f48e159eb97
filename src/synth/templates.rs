use crate::feature::feature_model::{Feature, FeatureAttributes, FeatureSubtype, Field};
use crate::screen::screen_model::NavLink;
use crate::screen::url::{is_same_origin, url_path};

use super::test_case::{Priority, Scope, StepAction, TestCase, TestStep, TestType};

/// Most links a navigation-menu case walks through.
const MAX_NAV_STEPS: usize = 5;

// ============================================================================
// Shared wording
// ============================================================================

/// "any page of the website" for site-wide features, the page path otherwise.
pub fn location_phrase(feature: &Feature) -> String {
    if feature.is_global {
        "any page of the website".to_string()
    } else {
        url_path(feature.first_page())
    }
}

/// Where a check happens, for inline use in steps: "on the website" or "on /path".
pub fn on_location(feature: &Feature) -> String {
    if feature.is_global {
        "on the website".to_string()
    } else {
        format!("on {}", url_path(feature.first_page()))
    }
}

/// Derive a sensible fill value from a field's label and type.
pub fn guess_value(label: &str, input_type: &str) -> String {
    let l = label.to_lowercase();

    // Label-based heuristics (checked in order)
    if l.contains("email") {
        return "user@example.com".into();
    }
    if l.contains("password") {
        return "TestPass123!".into();
    }
    if l.contains("cvv") || l.contains("cvc") {
        return "123".into();
    }
    if l.contains("expir") {
        return "12/30".into();
    }
    if l.contains("card") {
        return "4111 1111 1111 1111".into();
    }
    if l.contains("phone") || l.contains("tel") {
        return "555-0100".into();
    }
    if l.contains("url") || l.contains("website") {
        return "https://example.com".into();
    }
    if l.contains("zip") || l.contains("postal") {
        return "90210".into();
    }
    if l.contains("username") || l.contains("user") {
        return "testuser".into();
    }
    if l.contains("name") {
        return "Jane Doe".into();
    }
    if l.contains("search") || l.contains("query") || l == "q" {
        return "test query".into();
    }
    if l.contains("date") {
        return "2025-01-15".into();
    }
    if l.contains("number") || l.contains("amount") || l.contains("quantity") {
        return "42".into();
    }

    // Fallback to input type
    match input_type {
        "email" => "user@example.com".into(),
        "password" => "TestPass123!".into(),
        "tel" => "555-0100".into(),
        "url" => "https://example.com".into(),
        "number" => "42".into(),
        "date" => "2025-01-15".into(),
        "checkbox" | "radio" => "checked".into(),
        "select" => "first option".into(),
        _ => "test".into(),
    }
}

fn field_key(field: &Field) -> String {
    let display = field.display_name();
    if display.is_empty() {
        field.input_type.clone()
    } else {
        display
    }
}

fn fill_steps(fields: &[Field], value_for: impl Fn(&Field) -> String) -> Vec<TestStep> {
    fields
        .iter()
        .map(|f| {
            StepAction::Fill {
                field: field_key(f),
                value: value_for(f),
            }
            .into()
        })
        .collect()
}

/// A plausible valid value for `field`.
pub fn valid_value(field: &Field) -> String {
    let key = [&field.name, &field.label, &field.placeholder]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    guess_value(&key, &field.input_type)
}

/// Skeleton shared by every template; callers fill in the rest.
fn base_case(
    feature: &Feature,
    title: String,
    category: &str,
    priority: Priority,
    test_type: TestType,
) -> TestCase {
    TestCase {
        id: String::new(),
        title,
        preconditions: vec![format!("User is on {}", location_phrase(feature))],
        steps: vec![StepAction::Navigate {
            url: feature.first_page().to_string(),
        }
        .into()],
        expected_results: vec![],
        priority,
        category: category.to_string(),
        scope: Scope::from_global(feature.is_global),
        affected_pages: feature.appears_on_pages.clone(),
        test_type,
    }
}

fn submit_step(feature: &Feature) -> TestStep {
    StepAction::Click {
        label: feature.submit_label().unwrap_or("Submit").to_string(),
    }
    .into()
}

fn verify(expectation: impl Into<String>) -> TestStep {
    StepAction::Verify {
        expectation: expectation.into(),
    }
    .into()
}

// ============================================================================
// Per-kind templates
// ============================================================================

/// Test cases for one reconciled feature. Ids are left empty.
pub fn cases_for(feature: &Feature) -> Vec<TestCase> {
    match &feature.attributes {
        FeatureAttributes::Form { .. } => form_cases(feature),
        FeatureAttributes::Button { text } => vec![button_case(feature, text)],
        FeatureAttributes::Link { text, href } => vec![link_case(feature, text, href)],
        FeatureAttributes::Table { headers, row_count } => {
            vec![table_case(feature, headers, *row_count)]
        }
        FeatureAttributes::Navigation { links } => {
            if links.is_empty() {
                vec![]
            } else {
                vec![navigation_case(feature)]
            }
        }
        FeatureAttributes::Modal { title } => vec![modal_case(feature, title.as_deref())],
    }
}

fn form_name(feature: &Feature, kind: &str) -> String {
    match &feature.attributes {
        FeatureAttributes::Form {
            title: Some(title), ..
        } => format!("{} Form \"{}\"", kind, title),
        _ => format!("{} Form", kind),
    }
}

fn form_cases(feature: &Feature) -> Vec<TestCase> {
    let fields = feature.fields();

    match feature.subtype.unwrap_or(FeatureSubtype::DataEntry) {
        FeatureSubtype::Login => login_cases(feature, fields),
        FeatureSubtype::Search => {
            let mut case = base_case(
                feature,
                format!("{}: returns results for a valid query", form_name(feature, "Search")),
                "Search",
                Priority::Medium,
                TestType::Automated,
            );
            case.steps.extend(fill_steps(fields, valid_value));
            case.steps.push(submit_step(feature));
            case.steps.push(verify(format!("search results are displayed {}", on_location(feature))));
            case.expected_results = vec![
                "Results matching the query are displayed".into(),
                "An empty query does not produce an error page".into(),
            ];
            vec![case]
        }
        FeatureSubtype::Payment => {
            let mut case = base_case(
                feature,
                format!("{}: validates card details", form_name(feature, "Payment")),
                "Payment",
                Priority::High,
                TestType::Automated,
            );
            case.steps.extend(fill_steps(fields, valid_value));
            case.steps.push(submit_step(feature));
            case.steps.push(verify("the payment is accepted or a clear validation message is shown"));
            case.expected_results = vec![
                "Valid test card details are accepted".into(),
                "Invalid card numbers are rejected with a validation message".into(),
            ];
            vec![case]
        }
        FeatureSubtype::Registration => {
            let name = form_name(feature, "Registration");

            let mut success = base_case(
                feature,
                format!("{}: creates an account with valid data", name),
                "Registration",
                Priority::High,
                TestType::Automated,
            );
            success.steps.extend(fill_steps(fields, valid_value));
            success.steps.push(submit_step(feature));
            success.steps.push(verify("a confirmation is shown"));
            success.expected_results = vec!["Account is created".into(), "User sees a confirmation".into()];

            let mut missing = base_case(
                feature,
                format!("{}: rejects missing required fields", name),
                "Registration",
                Priority::Medium,
                TestType::Automated,
            );
            missing.steps.push(submit_step(feature));
            missing.steps.push(verify("required-field messages are shown"));
            missing.expected_results = vec![
                "Submission is blocked".into(),
                "Each required field shows a validation message".into(),
            ];

            vec![success, missing]
        }
        FeatureSubtype::Feedback => {
            let mut case = base_case(
                feature,
                format!("{}: submits a message", form_name(feature, "Feedback")),
                "Feedback",
                Priority::Medium,
                TestType::Automated,
            );
            case.steps.extend(fill_steps(fields, valid_value));
            case.steps.push(submit_step(feature));
            case.steps.push(verify("a thank-you or confirmation message is shown"));
            case.expected_results = vec!["The message is submitted successfully".into()];
            vec![case]
        }
        _ => {
            let mut case = base_case(
                feature,
                format!("{}: saves valid input", form_name(feature, "Data Entry")),
                "Data Entry",
                Priority::Medium,
                TestType::Automated,
            );
            case.steps.extend(fill_steps(fields, valid_value));
            case.steps.push(submit_step(feature));
            case.steps.push(verify("the entered data is saved"));
            case.expected_results = vec![
                "The form submits without errors".into(),
                "The saved data is visible afterwards".into(),
            ];
            vec![case]
        }
    }
}

fn login_cases(feature: &Feature, fields: &[Field]) -> Vec<TestCase> {
    let mut valid = base_case(
        feature,
        "Login: successful login with valid credentials".to_string(),
        "Authentication",
        Priority::High,
        TestType::Automated,
    );
    valid.preconditions.push("A registered test account exists".into());
    valid.steps.extend(fill_steps(fields, |f| {
        if f.input_type == "password" {
            "<valid password>".into()
        } else {
            "<valid username>".into()
        }
    }));
    valid.steps.push(submit_step(feature));
    valid.steps.push(verify("the user is signed in"));
    valid.expected_results = vec![
        "User is authenticated and redirected".into(),
        "No error message is displayed".into(),
    ];

    let mut invalid = base_case(
        feature,
        "Login: rejected with invalid credentials".to_string(),
        "Authentication",
        Priority::High,
        TestType::Automated,
    );
    invalid.steps.extend(fill_steps(fields, |f| {
        if f.input_type == "password" {
            "WrongPass123!".into()
        } else {
            "invalid@example.com".into()
        }
    }));
    invalid.steps.push(submit_step(feature));
    invalid.steps.push(verify("an error message is shown"));
    invalid.expected_results = vec![
        "An error message is displayed".into(),
        "User remains on the login form".into(),
    ];

    vec![valid, invalid]
}

fn button_case(feature: &Feature, text: &str) -> TestCase {
    let subtype = feature.subtype.unwrap_or(FeatureSubtype::Action);

    let (priority, expectation) = match subtype {
        FeatureSubtype::Create => (Priority::High, "a creation form or a new item appears"),
        FeatureSubtype::Update => (Priority::High, "the item becomes editable and changes can be saved"),
        FeatureSubtype::Delete => (Priority::High, "a confirmation is requested and the item is removed"),
        FeatureSubtype::Export => (Priority::Medium, "a file download starts"),
        FeatureSubtype::Filter => (Priority::Medium, "the displayed data is filtered or reordered"),
        _ => (Priority::Low, "the expected response occurs without errors"),
    };

    let mut case = base_case(
        feature,
        format!("Button \"{}\": performs {} action", text, subtype),
        subtype.as_str(),
        priority,
        TestType::Automated,
    );
    case.steps.push(StepAction::Click { label: text.to_string() }.into());
    case.steps.push(verify(expectation));
    case.expected_results = vec![
        format!("The \"{}\" button is visible and enabled {}", text, on_location(feature)),
        format!("After clicking, {}", expectation),
    ];
    case
}

fn link_case(feature: &Feature, text: &str, href: &str) -> TestCase {
    let target = if is_same_origin(feature.first_page(), href) {
        url_path(href)
    } else {
        href.to_string()
    };

    let mut case = base_case(
        feature,
        format!("Link \"{}\": navigates to {}", text, target),
        "Navigation",
        Priority::Low,
        TestType::Automated,
    );
    case.steps.push(StepAction::Click { label: text.to_string() }.into());
    case.steps.push(verify(format!("the browser navigates to {}", href)));
    case.expected_results = vec![
        format!("The page at {} loads", target),
        "No error page or broken link is shown".into(),
    ];
    case
}

fn table_case(feature: &Feature, headers: &[String], row_count: usize) -> TestCase {
    let columns = if headers.is_empty() {
        "its data".to_string()
    } else {
        format!("columns {}", headers.join(", "))
    };

    let mut case = base_case(
        feature,
        format!("Data Table: displays {}", columns),
        "Data Display",
        Priority::Medium,
        TestType::Manual,
    );
    case.steps = vec![
        TestStep::text(format!("Open {}", location_phrase(feature))),
        TestStep::text("Locate the data table"),
        TestStep::text("Check each column header"),
        TestStep::text("Check that rows render with values in every column"),
    ];
    case.expected_results = headers
        .iter()
        .map(|h| format!("Column \"{}\" is present", h))
        .collect();
    case.expected_results.push(if row_count > 0 {
        format!("{} row(s) are displayed", row_count)
    } else {
        "An empty-state message is displayed when there is no data".to_string()
    });
    case
}

fn navigation_case(feature: &Feature) -> TestCase {
    let links: &[NavLink] = match &feature.attributes {
        FeatureAttributes::Navigation { links } => links.as_slice(),
        _ => &[],
    };

    let mut case = base_case(
        feature,
        format!("Navigation Menu: all {} links are reachable", links.len()),
        "Navigation",
        Priority::Medium,
        TestType::Automated,
    );
    for link in links.iter().take(MAX_NAV_STEPS) {
        case.steps.push(StepAction::Click { label: link.text.clone() }.into());
        case.steps.push(verify(format!("the browser navigates to {}", link.href)));
        case.steps.push(StepAction::Navigate { url: feature.first_page().to_string() }.into());
    }
    if links.len() > MAX_NAV_STEPS {
        case.steps.push(TestStep::text(format!(
            "Repeat for the remaining {} links",
            links.len() - MAX_NAV_STEPS
        )));
    }
    case.expected_results = vec![
        format!("The menu is visible {}", on_location(feature)),
        "Every menu link opens its page without errors".into(),
    ];
    case
}

fn modal_case(feature: &Feature, title: Option<&str>) -> TestCase {
    let name = title.unwrap_or("dialog");

    let mut case = base_case(
        feature,
        format!("Modal \"{}\": opens and closes", name),
        "UI Interaction",
        Priority::Low,
        TestType::Manual,
    );
    case.steps = vec![
        TestStep::text(format!("Open {}", location_phrase(feature))),
        TestStep::text(format!("Trigger the \"{}\" dialog", name)),
        TestStep::text("Close it with its close button and with the Escape key"),
    ];
    case.expected_results = vec![
        "The dialog opens on top of the page".into(),
        "The dialog closes and the page is usable again".into(),
    ];
    case
}
