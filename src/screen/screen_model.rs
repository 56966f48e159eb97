use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

// ============================================================================
// Flattened DOM snapshot produced by the page loader's evaluation script
// ============================================================================

/// One DOM node as reported by the evaluation script, in document order.
///
/// Only the attributes the extractor cares about are carried. Aggregate
/// nodes (tables, nav blocks) arrive pre-summarized: `headers`/`row_count`
/// for tables, `links` for navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomElement {
    pub tag: String,
    pub text: Option<String>,
    pub role: Option<String>,
    pub r#type: Option<String>,
    pub aria_label: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub placeholder: Option<String>,
    pub href: Option<String>,
    pub value: Option<String>,

    /// Text of the `<label>` associated with this control, if any.
    pub label: Option<String>,

    pub disabled: bool,
    pub hidden: bool,

    /// Id of the enclosing `<form>`. The loader assigns one when the form has none.
    pub form_id: Option<String>,

    /// Ancestor chain, nearest first.
    pub ancestors: Vec<AncestorHint>,

    pub headers: Vec<String>,
    pub row_count: usize,
    pub links: Vec<NavLink>,
}

impl DomElement {
    pub fn tag_is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn type_is(&self, input_type: &str) -> bool {
        self.r#type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(input_type))
    }

    pub fn role_is(&self, role: &str) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(role))
    }

    /// First non-empty of aria-label, visible text, value.
    pub fn display_text(&self) -> Option<String> {
        [&self.aria_label, &self.text, &self.value]
            .into_iter()
            .flatten()
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AncestorHint {
    pub tag: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    pub text: String,
    pub href: String,
}

// ============================================================================
// Page snapshot
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub dom: Vec<DomElement>,
}

impl PageSnapshot {
    /// Parse a raw evaluation result.
    ///
    /// Entries of the `dom` array are decoded one at a time; an entry that
    /// does not decode is logged and skipped so a single odd node never
    /// costs the whole page. Returns `None` when there is no `dom` array.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let entries = raw["dom"].as_array()?;

        let mut dom = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match serde_json::from_value::<DomElement>(entry.clone()) {
                Ok(el) => dom.push(el),
                Err(e) => warn!(index, error = %e, "skipping undecodable DOM entry"),
            }
        }

        Some(PageSnapshot {
            url: raw["url"].as_str().unwrap_or_default().to_string(),
            title: raw["title"].as_str().unwrap_or_default().to_string(),
            dom,
        })
    }
}
