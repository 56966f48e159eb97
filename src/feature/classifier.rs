use tracing::trace;

use crate::feature::feature_model::{Feature, FeatureAttributes, FeatureSubtype};

// ============================================================================
// Keyword rules, evaluated in order, first match wins
// ============================================================================

/// Lowercased signal text with the two lookups the rules need.
pub struct Signals {
    text: String,
    words: Vec<String>,
}

impl Signals {
    pub fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, words }
    }

    /// Substring match.
    pub fn has(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }

    /// Whole-word match.
    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

pub struct Rule {
    pub subtype: FeatureSubtype,
    pub matches: fn(&Signals) -> bool,
}

/// Form rules. "email password confirm" must not be a login form, so the
/// login rule excludes `confirm` and lets registration pick it up.
pub const FORM_RULES: &[Rule] = &[
    Rule {
        subtype: FeatureSubtype::Login,
        matches: |s| (s.has("email") || s.has("user")) && s.has("password") && !s.has("confirm"),
    },
    Rule {
        subtype: FeatureSubtype::Search,
        matches: |s| s.has("search") || s.has("query") || s.has_word("q"),
    },
    Rule {
        subtype: FeatureSubtype::Payment,
        matches: |s| s.has("card") || s.has("payment") || s.has("cvv"),
    },
    Rule {
        subtype: FeatureSubtype::Registration,
        matches: |s| {
            s.has("register")
                || s.has("signup")
                || s.has("sign up")
                || (s.has("email") && s.has("confirm"))
        },
    },
    Rule {
        subtype: FeatureSubtype::Feedback,
        matches: |s| s.has("comment") || s.has("message") || s.has("feedback"),
    },
];

/// Button rules. Whole words, so "Address" is not "add" and "News" is not "new".
pub const BUTTON_RULES: &[Rule] = &[
    Rule {
        subtype: FeatureSubtype::Create,
        matches: |s| s.has_word("add") || s.has_word("create") || s.has_word("new"),
    },
    Rule {
        subtype: FeatureSubtype::Update,
        matches: |s| s.has_word("edit") || s.has_word("update") || s.has_word("modify"),
    },
    Rule {
        subtype: FeatureSubtype::Delete,
        matches: |s| s.has_word("delete") || s.has_word("remove"),
    },
    Rule {
        subtype: FeatureSubtype::Export,
        matches: |s| s.has_word("export") || s.has_word("download"),
    },
    Rule {
        subtype: FeatureSubtype::Filter,
        matches: |s| s.has_word("filter") || s.has_word("sort"),
    },
];

fn first_match(rules: &[Rule], signals: &Signals, fallback: FeatureSubtype) -> FeatureSubtype {
    rules
        .iter()
        .find(|rule| (rule.matches)(signals))
        .map(|rule| rule.subtype)
        .unwrap_or(fallback)
}

pub fn classify_form_text(text: &str) -> FeatureSubtype {
    first_match(FORM_RULES, &Signals::new(text), FeatureSubtype::DataEntry)
}

pub fn classify_button_text(text: &str) -> FeatureSubtype {
    first_match(BUTTON_RULES, &Signals::new(text), FeatureSubtype::Action)
}

// ============================================================================
// Feature classification
// ============================================================================

/// Concatenate everything a form says about itself: per field the name,
/// placeholder, label and telling input types, plus the container's own
/// title and role.
pub fn form_signal_text(feature: &Feature) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if let FeatureAttributes::Form { title, role, .. } = &feature.attributes {
        parts.extend(title.as_deref());
        parts.extend(role.as_deref());
    }

    for field in feature.fields() {
        parts.extend(field.name.as_deref());
        parts.extend(field.placeholder.as_deref());
        parts.extend(field.label.as_deref());
        if matches!(field.input_type.as_str(), "email" | "password" | "search") {
            parts.push(&field.input_type);
        }
    }

    parts.join(" ")
}

/// Assign a subtype to forms and buttons. Other kinds, and features that
/// already carry a subtype, pass through untouched.
pub fn classify(mut feature: Feature) -> Feature {
    if feature.subtype.is_some() {
        return feature;
    }

    let subtype = match &feature.attributes {
        FeatureAttributes::Form { .. } => Some(classify_form_text(&form_signal_text(&feature))),
        FeatureAttributes::Button { text } => Some(classify_button_text(text)),
        _ => None,
    };

    if let Some(subtype) = subtype {
        trace!(
            kind = %feature.kind,
            text = %feature.display_text(),
            %subtype,
            "classified"
        );
    }

    feature.subtype = subtype;
    feature
}

pub fn classify_all(features: Vec<Feature>) -> Vec<Feature> {
    features.into_iter().map(classify).collect()
}

