use std::fmt;

use serde::{Deserialize, Serialize};

use crate::screen::screen_model::NavLink;

// ============================================================================
// Feature: a detected structural element plus its classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Form,
    Button,
    Link,
    Table,
    Navigation,
    Modal,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Form => "form",
            FeatureKind::Button => "button",
            FeatureKind::Link => "link",
            FeatureKind::Table => "table",
            FeatureKind::Navigation => "navigation",
            FeatureKind::Modal => "modal",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic classification. Form subtypes and button subtypes share one
/// enum; tables, navigation blocks and modals carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureSubtype {
    // forms
    Login,
    Search,
    Payment,
    Registration,
    Feedback,
    DataEntry,
    // buttons
    Create,
    Update,
    Delete,
    Export,
    Filter,
    Action,
}

impl FeatureSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureSubtype::Login => "login",
            FeatureSubtype::Search => "search",
            FeatureSubtype::Payment => "payment",
            FeatureSubtype::Registration => "registration",
            FeatureSubtype::Feedback => "feedback",
            FeatureSubtype::DataEntry => "data-entry",
            FeatureSubtype::Create => "create",
            FeatureSubtype::Update => "update",
            FeatureSubtype::Delete => "delete",
            FeatureSubtype::Export => "export",
            FeatureSubtype::Filter => "filter",
            FeatureSubtype::Action => "action",
        }
    }

    /// True for the subtypes that mutate records (create/update/delete).
    pub fn is_crud(&self) -> bool {
        matches!(
            self,
            FeatureSubtype::Create | FeatureSubtype::Update | FeatureSubtype::Delete
        )
    }
}

impl fmt::Display for FeatureSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input-capable control inside a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: Option<String>,
    pub input_type: String,
    pub placeholder: Option<String>,
    pub label: Option<String>,
}

impl Field {
    /// Best human-facing name: label, then placeholder, then name.
    pub fn display_name(&self) -> String {
        self.label
            .as_deref()
            .or(self.placeholder.as_deref())
            .or(self.name.as_deref())
            .unwrap_or(&self.input_type)
            .trim()
            .to_string()
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeatureAttributes {
    Form {
        /// aria-label, name or id of the form container, when present
        title: Option<String>,
        /// `role` attribute of the container (`search` is common)
        role: Option<String>,
        fields: Vec<Field>,
        #[serde(rename = "submitLabel")]
        submit_label: Option<String>,
        /// Synthesized from bare inputs with no enclosing `<form>`
        #[serde(rename = "virtual")]
        is_virtual: bool,
    },
    Button {
        text: String,
    },
    Link {
        text: String,
        href: String,
    },
    Table {
        headers: Vec<String>,
        #[serde(rename = "rowCount")]
        row_count: usize,
    },
    Navigation {
        links: Vec<NavLink>,
    },
    Modal {
        title: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub kind: FeatureKind,
    pub subtype: Option<FeatureSubtype>,
    pub attributes: FeatureAttributes,
    pub origin_page: String,
    pub fingerprint: String,
    pub is_global: bool,
    pub appears_on_pages: Vec<String>,
}

impl Feature {
    /// A raw, unclassified feature observed on `origin_page`.
    ///
    /// `in_page_chrome` is the structural region signal; the multi-page
    /// half of `is_global` is only decided at reconciliation.
    pub fn observed(
        kind: FeatureKind,
        attributes: FeatureAttributes,
        origin_page: &str,
        in_page_chrome: bool,
    ) -> Self {
        Self {
            kind,
            subtype: None,
            attributes,
            origin_page: origin_page.to_string(),
            fingerprint: String::new(),
            is_global: in_page_chrome,
            appears_on_pages: vec![origin_page.to_string()],
        }
    }

    pub fn with_subtype(mut self, subtype: FeatureSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    /// Human-facing identity: button/link text, form title, table headers, ...
    pub fn display_text(&self) -> String {
        match &self.attributes {
            FeatureAttributes::Form { title, .. } => title
                .clone()
                .or_else(|| self.subtype.map(|s| s.as_str().to_string()))
                .unwrap_or_else(|| "form".to_string()),
            FeatureAttributes::Button { text } => text.clone(),
            FeatureAttributes::Link { text, .. } => text.clone(),
            FeatureAttributes::Table { headers, .. } => {
                if headers.is_empty() {
                    "table".to_string()
                } else {
                    headers.join(", ")
                }
            }
            FeatureAttributes::Navigation { links } => links
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
            FeatureAttributes::Modal { title } => {
                title.clone().unwrap_or_else(|| "dialog".to_string())
            }
        }
    }

    pub fn submit_label(&self) -> Option<&str> {
        match &self.attributes {
            FeatureAttributes::Form { submit_label, .. } => submit_label.as_deref(),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[Field] {
        match &self.attributes {
            FeatureAttributes::Form { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn has_subtype(&self, subtype: FeatureSubtype) -> bool {
        self.subtype == Some(subtype)
    }

    /// First page the feature was seen on.
    pub fn first_page(&self) -> &str {
        self.appears_on_pages
            .first()
            .map(String::as_str)
            .unwrap_or(&self.origin_page)
    }
}
