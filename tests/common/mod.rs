#![allow(dead_code)]

use ui_test_synth::feature::feature_model::{
    Feature, FeatureAttributes, FeatureKind, FeatureSubtype, Field,
};
use ui_test_synth::screen::screen_model::{AncestorHint, DomElement, NavLink, PageSnapshot};

// ============================================================================
// DOM element builders
// ============================================================================

pub fn el(tag: &str) -> DomElement {
    DomElement {
        tag: tag.to_string(),
        ..Default::default()
    }
}

pub fn form(id: &str) -> DomElement {
    DomElement {
        id: Some(id.to_string()),
        form_id: Some(id.to_string()),
        ..el("form")
    }
}

/// An `<input>` inside the form `form_id`.
pub fn form_input(form_id: &str, name: &str, input_type: &str) -> DomElement {
    DomElement {
        name: Some(name.to_string()),
        r#type: Some(input_type.to_string()),
        form_id: Some(form_id.to_string()),
        ..el("input")
    }
}

pub fn form_submit(form_id: &str, text: &str) -> DomElement {
    DomElement {
        text: Some(text.to_string()),
        r#type: Some("submit".to_string()),
        form_id: Some(form_id.to_string()),
        ..el("button")
    }
}

/// An `<input>` with no enclosing form.
pub fn bare_input(name: &str, input_type: &str) -> DomElement {
    DomElement {
        name: Some(name.to_string()),
        r#type: Some(input_type.to_string()),
        ..el("input")
    }
}

pub fn button(text: &str) -> DomElement {
    DomElement {
        text: Some(text.to_string()),
        ..el("button")
    }
}

pub fn link(text: &str, href: &str) -> DomElement {
    DomElement {
        text: Some(text.to_string()),
        href: Some(href.to_string()),
        ..el("a")
    }
}

pub fn table(headers: &[&str], rows: usize) -> DomElement {
    DomElement {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        row_count: rows,
        ..el("table")
    }
}

pub fn nav(links: &[(&str, &str)]) -> DomElement {
    DomElement {
        links: links
            .iter()
            .map(|(text, href)| NavLink {
                text: text.to_string(),
                href: href.to_string(),
            })
            .collect(),
        ..el("nav")
    }
}

pub fn dialog(title: &str) -> DomElement {
    DomElement {
        aria_label: Some(title.to_string()),
        ..el("dialog")
    }
}

/// Place `element` inside a `<header>`.
pub fn in_header(mut element: DomElement) -> DomElement {
    element.ancestors.push(AncestorHint {
        tag: "header".to_string(),
        ..Default::default()
    });
    element
}

/// Place `element` inside a plain `<div class=...>`.
pub fn in_div(mut element: DomElement, class_name: &str) -> DomElement {
    element.ancestors.push(AncestorHint {
        tag: "div".to_string(),
        class_name: Some(class_name.to_string()),
        ..Default::default()
    });
    element
}

pub fn snapshot(url: &str, dom: Vec<DomElement>) -> PageSnapshot {
    PageSnapshot {
        url: url.to_string(),
        title: String::new(),
        dom,
    }
}

// ============================================================================
// Feature builders
// ============================================================================

pub fn field(name: &str, input_type: &str) -> Field {
    Field {
        name: Some(name.to_string()),
        input_type: input_type.to_string(),
        placeholder: None,
        label: None,
    }
}

pub fn form_feature(page: &str, fields: Vec<Field>, subtype: FeatureSubtype) -> Feature {
    Feature::observed(
        FeatureKind::Form,
        FeatureAttributes::Form {
            title: None,
            role: None,
            fields,
            submit_label: Some("Save".to_string()),
            is_virtual: false,
        },
        page,
        false,
    )
    .with_subtype(subtype)
}

pub fn button_feature(page: &str, text: &str, subtype: FeatureSubtype) -> Feature {
    Feature::observed(
        FeatureKind::Button,
        FeatureAttributes::Button {
            text: text.to_string(),
        },
        page,
        false,
    )
    .with_subtype(subtype)
}

pub fn link_feature(page: &str, text: &str, href: &str, in_chrome: bool) -> Feature {
    Feature::observed(
        FeatureKind::Link,
        FeatureAttributes::Link {
            text: text.to_string(),
            href: href.to_string(),
        },
        page,
        in_chrome,
    )
}

pub fn table_feature(page: &str, headers: &[&str]) -> Feature {
    Feature::observed(
        FeatureKind::Table,
        FeatureAttributes::Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            row_count: 3,
        },
        page,
        false,
    )
}

// ============================================================================
// Scratch directories
// ============================================================================

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("ui-test-synth-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
