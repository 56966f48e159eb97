use std::collections::HashSet;

use tracing::debug;

use crate::config::limits::AnalysisLimits;
use crate::feature::feature_model::{Feature, FeatureKind};
use crate::reconcile::fingerprint::normalize_text;

use super::templates::cases_for;
use super::test_case::TestCase;
use super::workflow::crud_workflow;

/// Request-level facts that change the wording of every case.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesisContext {
    /// A login was performed before the pages were analyzed.
    pub authenticated: bool,
}

// ============================================================================
// Test-case synthesis
// ============================================================================

/// Turn reconciled features into test cases.
///
/// Features are processed in order, so when a per-kind cap bites the
/// earlier pages' features win. The final list is stable-sorted by
/// priority (Critical first), cut to `max_total_cases`, and numbered.
pub fn synthesize(
    features: &[Feature],
    limits: &AnalysisLimits,
    context: &SynthesisContext,
) -> Vec<TestCase> {
    let mut cases: Vec<TestCase> = Vec::new();
    let mut seen: HashSet<(FeatureKind, String, String)> = HashSet::new();
    let mut button_cases = 0usize;
    let mut link_cases = 0usize;

    for feature in features {
        // Second line of defence after fingerprint dedup: the text-based key
        // catches features whose structure differs but read the same.
        let key = (
            feature.kind,
            display_identity(feature),
            feature.first_page().to_string(),
        );
        if !seen.insert(key) {
            debug!(
                kind = %feature.kind,
                text = %feature.display_text(),
                "skipping duplicate feature"
            );
            continue;
        }

        let (mut counter, cap) = match feature.kind {
            FeatureKind::Button => (Some(&mut button_cases), limits.max_button_cases),
            FeatureKind::Link => (Some(&mut link_cases), limits.max_link_cases),
            _ => (None, usize::MAX),
        };

        for case in cases_for(feature) {
            if let Some(count) = counter.as_mut() {
                if **count >= cap {
                    break;
                }
                **count += 1;
            }
            cases.push(case);
        }
    }

    if let Some(workflow) = crud_workflow(features) {
        cases.push(workflow);
    }

    finalize(cases, limits.max_total_cases, context)
}

/// What a reader would call the feature. Forms add their field names,
/// since untitled forms all read as their subtype.
fn display_identity(feature: &Feature) -> String {
    let text = normalize_text(&feature.display_text());
    if feature.kind != FeatureKind::Form {
        return text;
    }

    let fields = feature
        .fields()
        .iter()
        .map(|f| normalize_text(&f.display_name()))
        .collect::<Vec<_>>()
        .join(",");
    format!("{} [{}]", text, fields)
}

fn finalize(mut cases: Vec<TestCase>, max_total: usize, context: &SynthesisContext) -> Vec<TestCase> {
    // sort_by is stable: equal priorities keep insertion order
    cases.sort_by(|a, b| b.priority.cmp(&a.priority));

    if cases.len() > max_total {
        debug!(dropped = cases.len() - max_total, max_total, "truncating test cases");
        cases.truncate(max_total);
    }

    for (i, case) in cases.iter_mut().enumerate() {
        case.id = format!("TC-{:03}", i + 1);
        if context.authenticated {
            case.preconditions.insert(0, "User is logged in".to_string());
        }
    }

    cases
}
