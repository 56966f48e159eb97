use crate::screen::screen_model::{AncestorHint, DomElement};

/// Landmark tags that always mean site chrome.
const CHROME_TAGS: [&str; 3] = ["header", "footer", "nav"];

/// ARIA roles for the same regions.
const CHROME_ROLES: [&str; 3] = ["banner", "contentinfo", "navigation"];

/// class/id tokens that sites use for the same regions.
const CHROME_TOKENS: [&str; 9] = [
    "header",
    "footer",
    "nav",
    "navbar",
    "navigation",
    "topbar",
    "masthead",
    "banner",
    "site-header",
];

/// True if the element or any ancestor sits in a header/footer/nav region.
pub fn in_page_chrome(el: &DomElement) -> bool {
    let own = AncestorHint {
        tag: el.tag.clone(),
        id: el.id.clone(),
        class_name: el.class_name.clone(),
        role: el.role.clone(),
    };

    std::iter::once(&own)
        .chain(el.ancestors.iter())
        .any(is_chrome_region)
}

pub fn is_chrome_region(node: &AncestorHint) -> bool {
    let tag = node.tag.to_ascii_lowercase();
    if CHROME_TAGS.contains(&tag.as_str()) {
        return true;
    }

    if let Some(role) = &node.role {
        if CHROME_ROLES.contains(&role.to_ascii_lowercase().as_str()) {
            return true;
        }
    }

    [&node.id, &node.class_name]
        .into_iter()
        .flatten()
        .any(|attr| has_chrome_token(attr))
}

/// Component classes like `card-header` or `modal-footer` name parts of a
/// widget, not of the page.
const COMPONENT_PREFIXES: [&str; 7] = [
    "modal", "card", "panel", "dialog", "table", "section", "dropdown",
];

/// Whole-token match: `canvas` is not `nav`.
fn has_chrome_token(attr: &str) -> bool {
    let lower = attr.to_ascii_lowercase();

    lower.split_whitespace().any(|class| {
        if CHROME_TOKENS.contains(&class) {
            return true;
        }

        let parts: Vec<&str> = class.split(|c: char| c == '-' || c == '_').collect();
        match parts.first() {
            Some(first) if COMPONENT_PREFIXES.contains(first) => false,
            _ => parts.iter().any(|part| CHROME_TOKENS.contains(part)),
        }
    })
}
