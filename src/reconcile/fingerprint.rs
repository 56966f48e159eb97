use crate::feature::feature_model::{Feature, FeatureAttributes};
use crate::screen::url::normalize_href;

/// Collapse whitespace, lowercase, and strip surrounding punctuation that
/// sites sprinkle on labels ("Save »", "* Email").
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The part of the identity that is not display text. Every list is
/// sorted so DOM traversal order never changes the result.
fn discriminator(feature: &Feature) -> String {
    match &feature.attributes {
        FeatureAttributes::Form { fields, .. } => {
            let mut names: Vec<String> = fields
                .iter()
                .map(|f| {
                    let name = f.name.clone().unwrap_or_else(|| f.display_name());
                    format!("{}:{}", normalize_text(&name), f.input_type)
                })
                .collect();
            names.sort();
            let subtype = feature.subtype.map(|s| s.as_str()).unwrap_or("-");
            format!("{}[{}]", subtype, names.join(","))
        }
        FeatureAttributes::Button { .. } => feature
            .subtype
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        FeatureAttributes::Link { href, .. } => normalize_href(href),
        FeatureAttributes::Table { headers, .. } => {
            let mut headers: Vec<String> = headers.iter().map(|h| normalize_text(h)).collect();
            headers.sort();
            headers.join(",")
        }
        FeatureAttributes::Navigation { links } => {
            let mut hrefs: Vec<String> = links.iter().map(|l| normalize_href(&l.href)).collect();
            hrefs.sort();
            hrefs.dedup();
            hrefs.join(",")
        }
        FeatureAttributes::Modal { .. } => String::new(),
    }
}

/// Display text that identifies the feature. Tables and nav blocks are
/// identified by their (sorted) discriminator alone.
fn identity_text(feature: &Feature) -> String {
    match &feature.attributes {
        FeatureAttributes::Table { .. } | FeatureAttributes::Navigation { .. } => String::new(),
        _ => normalize_text(&feature.display_text()),
    }
}

/// Deterministic identity key: `"<kind>:<sha1>"`.
///
/// Two features are the same real-world element iff their fingerprints
/// are equal.
pub fn fingerprint(feature: &Feature) -> String {
    let key = format!(
        "{}|{}|{}",
        feature.kind,
        identity_text(feature),
        discriminator(feature)
    );
    format!("{}:{}", feature.kind, text_fingerprint(&key))
}
