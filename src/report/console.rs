use crate::analysis::request::AnalysisResponse;
use crate::synth::test_case::{Scope, TestCase, TestType};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format an analysis response for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Cases: 2 from 1 page(s) ===
///
/// TC-001 [High] Login: successful login with valid credentials
///     Authentication | Page-specific | Automated
///     1. Navigate to https://shop.test/login
///     ...
///
/// === Results: 2 test cases ===
/// ```
pub fn format_console_report(response: &AnalysisResponse) -> String {
    let mut out = String::new();

    if !response.success {
        out.push_str(&format!(
            "\u{2717} Analysis failed: {}\n",
            response.message.as_deref().unwrap_or("unknown error")
        ));
        if let Some(login) = response.login_success {
            out.push_str(&format!("    login succeeded: {}\n", login));
        }
        out.push_str(&format!("    pages analyzed: {}\n", response.pages_analyzed));
        return out;
    }

    out.push_str(&format!(
        "=== Test Cases: {} from {} page(s) ===\n",
        response.tests.len(),
        response.pages_analyzed
    ));
    if response.login_success == Some(true) {
        out.push_str("(authenticated session)\n");
    }

    for case in &response.tests {
        out.push('\n');
        out.push_str(&format_case(case));
    }

    out.push_str(&format!(
        "\n=== Results: {} test cases ===\n",
        response.tests.len()
    ));

    out
}

fn format_case(case: &TestCase) -> String {
    let mut out = format!("{} [{}] {}\n", case.id, case.priority, case.title);

    let test_type = match case.test_type {
        TestType::Manual => "Manual",
        TestType::Automated => "Automated",
    };
    out.push_str(&format!("    {} | {} | {}\n", case.category, case.scope, test_type));

    if case.scope == Scope::PageSpecific || case.affected_pages.len() > 1 {
        out.push_str(&format!("    pages: {}\n", case.affected_pages.join(", ")));
    }

    for pre in &case.preconditions {
        out.push_str(&format!("    given {}\n", pre));
    }

    for (i, step) in case.steps.iter().enumerate() {
        out.push_str(&format!("    {}. {}\n", i + 1, step));
    }

    for expected in &case.expected_results {
        out.push_str(&format!("    \u{2192} {}\n", expected));
    }

    out
}
