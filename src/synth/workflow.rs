use crate::feature::feature_model::{Feature, FeatureKind, FeatureSubtype};

use super::templates::{location_phrase, valid_value};
use super::test_case::{Priority, Scope, StepAction, TestCase, TestStep, TestType};

/// The features a CRUD workflow is assembled from.
struct CrudParts<'a> {
    form: &'a Feature,
    table: &'a Feature,
    create: Option<&'a Feature>,
    update: Option<&'a Feature>,
    delete: Option<&'a Feature>,
}

fn find_parts(features: &[Feature]) -> Option<CrudParts<'_>> {
    let form = features
        .iter()
        .find(|f| f.kind == FeatureKind::Form && f.has_subtype(FeatureSubtype::DataEntry))?;
    let table = features.iter().find(|f| f.kind == FeatureKind::Table)?;

    let button = |subtype| {
        features
            .iter()
            .find(|f| f.kind == FeatureKind::Button && f.has_subtype(subtype))
    };

    let parts = CrudParts {
        form,
        table,
        create: button(FeatureSubtype::Create),
        update: button(FeatureSubtype::Update),
        delete: button(FeatureSubtype::Delete),
    };

    if parts.create.is_none() && parts.update.is_none() && parts.delete.is_none() {
        return None;
    }
    Some(parts)
}

/// End-to-end create → verify → edit → verify → delete → verify case.
///
/// Emitted at most once per request, and only when the feature set holds
/// a data-entry form, a table and at least one create/update/delete
/// button. It is the only Critical case the synthesizer produces.
pub fn crud_workflow(features: &[Feature]) -> Option<TestCase> {
    let parts = find_parts(features)?;

    let label = |feature: Option<&Feature>, fallback: &str| {
        feature
            .map(|f| f.display_text())
            .unwrap_or_else(|| fallback.to_string())
    };
    let create = label(parts.create, "Add");
    let update = label(parts.update, "Edit");
    let delete = label(parts.delete, "Delete");

    let mut steps: Vec<TestStep> = vec![
        StepAction::Navigate {
            url: parts.table.first_page().to_string(),
        }
        .into(),
        StepAction::Click { label: create }.into(),
    ];
    for field in parts.form.fields() {
        steps.push(
            StepAction::Fill {
                field: field.display_name(),
                value: valid_value(field),
            }
            .into(),
        );
    }
    steps.extend([
        StepAction::Click {
            label: parts.form.submit_label().unwrap_or("Save").to_string(),
        }
        .into(),
        StepAction::Verify {
            expectation: "the new record appears in the table".into(),
        }
        .into(),
        StepAction::Click { label: update }.into(),
        TestStep::text("Change one field value and save"),
        StepAction::Verify {
            expectation: "the table shows the updated value".into(),
        }
        .into(),
        StepAction::Click { label: delete }.into(),
        TestStep::text("Confirm the deletion if prompted"),
        StepAction::Verify {
            expectation: "the record is no longer in the table".into(),
        }
        .into(),
    ]);

    let mut affected_pages: Vec<String> = Vec::new();
    let contributors = [Some(parts.form), Some(parts.table), parts.create, parts.update, parts.delete];
    for feature in contributors.into_iter().flatten() {
        for page in &feature.appears_on_pages {
            if !affected_pages.contains(page) {
                affected_pages.push(page.clone());
            }
        }
    }

    Some(TestCase {
        id: String::new(),
        title: "CRUD Workflow: create, edit and delete a record".to_string(),
        preconditions: vec![
            format!("User is on {}", location_phrase(parts.table)),
            "User may create, edit and delete records".to_string(),
        ],
        steps,
        expected_results: vec![
            "A record created through the form appears in the table".into(),
            "Edits to the record are reflected in the table".into(),
            "A deleted record disappears from the table".into(),
        ],
        priority: Priority::Critical,
        category: "Workflow".to_string(),
        scope: Scope::from_global(parts.table.is_global),
        affected_pages,
        test_type: TestType::Automated,
    })
}
