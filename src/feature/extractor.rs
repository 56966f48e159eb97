use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::limits::AnalysisLimits;
use crate::feature::feature_model::{
    Feature, FeatureAttributes, FeatureKind, FeatureSubtype, Field,
};
use crate::feature::region::in_page_chrome;
use crate::screen::screen_model::{DomElement, NavLink, PageSnapshot};
use crate::screen::url::resolve_href;

/// A single element could not be turned into a feature. Extraction logs
/// it and moves on to the next element.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("element #{index} has no tag")]
    MissingTag { index: usize },

    #[error("element #{index} ({tag}): {reason}")]
    Malformed {
        index: usize,
        tag: String,
        reason: String,
    },
}

/// Longest modal title kept; dialogs often report their whole body text.
const MAX_MODAL_TITLE_CHARS: usize = 80;

// ============================================================================
// Entry point
// ============================================================================

/// Scan one page snapshot and return its raw (unclassified) features.
///
/// Purely structural. Every kind is capped by `limits` and taken in
/// document order. Virtual login forms are the one exception that arrives
/// with a subtype already set.
pub fn extract_features(snapshot: &PageSnapshot, limits: &AnalysisLimits) -> Vec<Feature> {
    let page = snapshot.url.as_str();
    let mut features = extract_forms(snapshot, limits);

    let mut counts: HashMap<FeatureKind, usize> = HashMap::new();

    for (index, el) in snapshot.dom.iter().enumerate() {
        match extract_element(index, el, page) {
            Ok(Some(feature)) => {
                let count = counts.entry(feature.kind).or_insert(0);
                if *count < cap_for(feature.kind, limits) {
                    *count += 1;
                    features.push(feature);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(page, error = %e, "skipping element"),
        }
    }

    debug!(
        page,
        features = features.len(),
        buttons = counts.get(&FeatureKind::Button).copied().unwrap_or(0),
        links = counts.get(&FeatureKind::Link).copied().unwrap_or(0),
        "extracted page features"
    );

    features
}

fn cap_for(kind: FeatureKind, limits: &AnalysisLimits) -> usize {
    match kind {
        FeatureKind::Form => limits.max_forms,
        FeatureKind::Button => limits.max_buttons,
        FeatureKind::Link => limits.max_links,
        FeatureKind::Table => limits.max_tables,
        FeatureKind::Navigation => limits.max_navigation,
        FeatureKind::Modal => limits.max_modals,
    }
}

/// Non-form kinds. Forms are assembled separately because their fields
/// are scattered across many elements.
fn extract_element(
    index: usize,
    el: &DomElement,
    page: &str,
) -> Result<Option<Feature>, ExtractionError> {
    if el.tag.trim().is_empty() {
        return Err(ExtractionError::MissingTag { index });
    }

    if el.hidden {
        return Ok(None);
    }

    if is_table(el) {
        return Ok(Some(extract_table(index, el, page)?));
    }
    if is_navigation(el) {
        return Ok(extract_navigation(el, page));
    }
    if is_modal(el) {
        return Ok(Some(extract_modal(el, page)));
    }
    if is_button(el) {
        return Ok(extract_button(el, page));
    }
    if el.tag_is("a") {
        return Ok(extract_link(el, page));
    }

    Ok(None)
}

// ============================================================================
// Forms
// ============================================================================

/// A form being assembled from its container and its scattered controls.
struct FormDraft<'a> {
    container: Option<&'a DomElement>,
    controls: Vec<&'a DomElement>,
    submit_label: Option<String>,
}

fn extract_forms(snapshot: &PageSnapshot, limits: &AnalysisLimits) -> Vec<Feature> {
    let page = snapshot.url.as_str();
    let mut order: Vec<String> = Vec::new();
    let mut drafts: HashMap<String, FormDraft> = HashMap::new();
    let mut bare_inputs: Vec<&DomElement> = Vec::new();

    for el in &snapshot.dom {
        if el.hidden {
            continue;
        }

        if el.tag_is("form") {
            let Some(key) = el.form_id.clone().or_else(|| el.id.clone()) else {
                continue;
            };
            let draft = drafts.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                FormDraft {
                    container: None,
                    controls: vec![],
                    submit_label: None,
                }
            });
            draft.container = Some(el);
            continue;
        }

        match &el.form_id {
            Some(key) => {
                let draft = drafts.entry(key.clone()).or_insert_with(|| {
                    order.push(key.clone());
                    FormDraft {
                        container: None,
                        controls: vec![],
                        submit_label: None,
                    }
                });
                if is_field(el) {
                    draft.controls.push(el);
                } else if is_submit_control(el) && draft.submit_label.is_none() {
                    draft.submit_label = el.display_text();
                }
            }
            None => {
                if is_credential_shaped(el) {
                    bare_inputs.push(el);
                }
            }
        }
    }

    let mut forms: Vec<Feature> = order
        .iter()
        .filter_map(|key| drafts.get(key))
        .filter_map(|draft| build_form(draft, page))
        .take(limits.max_forms)
        .collect();

    if forms.len() < limits.max_forms {
        if let Some(virtual_form) = build_virtual_login(&bare_inputs, page) {
            forms.push(virtual_form);
        }
    }

    forms
}

fn build_form(draft: &FormDraft, page: &str) -> Option<Feature> {
    // A form with nothing to type into is not a form for testing purposes.
    if draft.controls.is_empty() {
        return None;
    }

    let fields: Vec<Field> = draft.controls.iter().map(|el| to_field(el)).collect();

    let title = draft.container.and_then(|form| {
        [&form.aria_label, &form.name, &form.id]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    });

    let chrome = match draft.container {
        Some(form) => in_page_chrome(form),
        None => draft.controls.iter().any(|el| in_page_chrome(el)),
    };

    let role = draft.container.and_then(|form| form.role.clone());

    Some(Feature::observed(
        FeatureKind::Form,
        FeatureAttributes::Form {
            title,
            role,
            fields,
            submit_label: draft.submit_label.clone(),
            is_virtual: false,
        },
        page,
        chrome,
    ))
}

/// Single-page apps often render login inputs with no `<form>` around
/// them. Two or more bare inputs with an email-shaped and a
/// password-shaped one are taken as a login form.
fn build_virtual_login(bare_inputs: &[&DomElement], page: &str) -> Option<Feature> {
    if bare_inputs.len() < 2 {
        return None;
    }

    let has_email = bare_inputs.iter().any(|el| is_email_shaped(el));
    let has_password = bare_inputs.iter().any(|el| el.type_is("password"));
    if !has_email || !has_password {
        return None;
    }

    let fields = bare_inputs.iter().map(|el| to_field(el)).collect();
    let chrome = bare_inputs.iter().any(|el| in_page_chrome(el));

    Some(
        Feature::observed(
            FeatureKind::Form,
            FeatureAttributes::Form {
                title: None,
                role: None,
                fields,
                submit_label: None,
                is_virtual: true,
            },
            page,
            chrome,
        )
        .with_subtype(FeatureSubtype::Login),
    )
}

fn is_field(el: &DomElement) -> bool {
    if el.tag_is("select") || el.tag_is("textarea") {
        return true;
    }
    if !el.tag_is("input") {
        return false;
    }

    !matches!(
        el.r#type.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("hidden" | "submit" | "button" | "reset" | "image")
    )
}

fn is_submit_control(el: &DomElement) -> bool {
    if el.disabled {
        return false;
    }
    if el.tag_is("input") {
        return el.type_is("submit") || el.type_is("image");
    }
    // <button> inside a form defaults to type=submit
    el.tag_is("button") && (el.r#type.is_none() || el.type_is("submit"))
}

fn is_credential_shaped(el: &DomElement) -> bool {
    el.tag_is("input")
        && match el.r#type.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("text" | "email" | "password" | "tel") => true,
            _ => false,
        }
}

fn is_email_shaped(el: &DomElement) -> bool {
    if el.type_is("email") {
        return true;
    }

    [&el.name, &el.id, &el.placeholder, &el.label, &el.aria_label]
        .into_iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .any(|s| s.contains("email") || s.contains("user") || s.contains("login"))
}

fn to_field(el: &DomElement) -> Field {
    let input_type = if el.tag_is("select") {
        "select".to_string()
    } else if el.tag_is("textarea") {
        "textarea".to_string()
    } else {
        el.r#type
            .as_deref()
            .unwrap_or("text")
            .to_ascii_lowercase()
    };

    Field {
        name: el.name.clone().or_else(|| el.id.clone()),
        input_type,
        placeholder: el.placeholder.clone(),
        label: el.label.clone().or_else(|| el.aria_label.clone()),
    }
}

// ============================================================================
// Buttons and links
// ============================================================================

fn is_button(el: &DomElement) -> bool {
    el.tag_is("button")
        || el.role_is("button")
        || (el.tag_is("input") && (el.type_is("submit") || el.type_is("button")))
}

fn extract_button(el: &DomElement, page: &str) -> Option<Feature> {
    if el.disabled {
        return None;
    }
    // A form's own submit control is covered by the form's test cases.
    if el.form_id.is_some() && is_submit_control(el) {
        return None;
    }

    let text = el.display_text()?;

    Some(Feature::observed(
        FeatureKind::Button,
        FeatureAttributes::Button { text },
        page,
        in_page_chrome(el),
    ))
}

fn extract_link(el: &DomElement, page: &str) -> Option<Feature> {
    let text = el.display_text()?;
    let href = resolve_href(page, el.href.as_deref()?)?;

    Some(Feature::observed(
        FeatureKind::Link,
        FeatureAttributes::Link { text, href },
        page,
        in_page_chrome(el),
    ))
}

// ============================================================================
// Tables, navigation blocks, modals
// ============================================================================

fn is_table(el: &DomElement) -> bool {
    el.tag_is("table") || el.role_is("table") || el.role_is("grid")
}

fn extract_table(index: usize, el: &DomElement, page: &str) -> Result<Feature, ExtractionError> {
    let headers: Vec<String> = el
        .headers
        .iter()
        .map(|h| h.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|h| !h.is_empty())
        .collect();

    if headers.is_empty() && el.row_count == 0 {
        return Err(ExtractionError::Malformed {
            index,
            tag: el.tag.clone(),
            reason: "table reported neither headers nor rows".into(),
        });
    }

    Ok(Feature::observed(
        FeatureKind::Table,
        FeatureAttributes::Table {
            headers,
            row_count: el.row_count,
        },
        page,
        in_page_chrome(el),
    ))
}

fn is_navigation(el: &DomElement) -> bool {
    el.tag_is("nav") || el.role_is("navigation")
}

fn extract_navigation(el: &DomElement, page: &str) -> Option<Feature> {
    let links: Vec<NavLink> = el
        .links
        .iter()
        .filter_map(|link| {
            let text = link.text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            let href = resolve_href(page, &link.href)?;
            Some(NavLink { text, href })
        })
        .collect();

    if links.is_empty() {
        return None;
    }

    Some(Feature::observed(
        FeatureKind::Navigation,
        FeatureAttributes::Navigation { links },
        page,
        in_page_chrome(el),
    ))
}

fn is_modal(el: &DomElement) -> bool {
    el.tag_is("dialog")
        || el.role_is("dialog")
        || el.role_is("alertdialog")
        || el
            .class_name
            .as_deref()
            .is_some_and(|c| c.split_whitespace().any(|t| t.eq_ignore_ascii_case("modal")))
}

fn extract_modal(el: &DomElement, page: &str) -> Feature {
    let title = el.display_text().map(|t| {
        if t.chars().count() > MAX_MODAL_TITLE_CHARS {
            t.chars().take(MAX_MODAL_TITLE_CHARS).collect::<String>().trim_end().to_string()
        } else {
            t
        }
    });

    Feature::observed(
        FeatureKind::Modal,
        FeatureAttributes::Modal { title },
        page,
        in_page_chrome(el),
    )
}
