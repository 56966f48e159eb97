use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feature::feature_model::Feature;

use super::fingerprint::fingerprint;

/// The classified features of one analyzed page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFeatures {
    pub url: String,
    pub features: Vec<Feature>,
}

impl PageFeatures {
    pub fn new(url: &str, features: Vec<Feature>) -> Self {
        Self {
            url: url.to_string(),
            features,
        }
    }
}

// ============================================================================
// Cross-page reconciliation
// ============================================================================

/// Deduplicate features across pages, keyed by fingerprint.
///
/// A pure fold over the pages: the first observation of a fingerprint is
/// kept (first-seen order), later observations only contribute their
/// pages and their page-chrome signal. `is_global` is settled in a final
/// pass, since multi-page recurrence is only known once every page is in.
pub fn reconcile(pages: &[PageFeatures]) -> Vec<Feature> {
    let merged = pages
        .iter()
        .flat_map(|page| page.features.iter().cloned())
        .fold(Merge::default(), Merge::observe);

    debug!(
        observed = merged.observed,
        unique = merged.features.len(),
        "reconciled features"
    );

    finalize(merged.features)
}

/// Reconcile a flat feature list, as if it came from a single batch.
/// Running this on its own output is a no-op on the set size.
pub fn reconcile_features(features: Vec<Feature>) -> Vec<Feature> {
    let merged = features.into_iter().fold(Merge::default(), Merge::observe);
    finalize(merged.features)
}

#[derive(Default)]
struct Merge {
    index: HashMap<String, usize>,
    features: Vec<Feature>,
    observed: usize,
}

impl Merge {
    fn observe(mut self, mut incoming: Feature) -> Self {
        self.observed += 1;
        incoming.fingerprint = fingerprint(&incoming);

        match self.index.get(&incoming.fingerprint) {
            Some(&i) => {
                let existing = &mut self.features[i];
                existing.is_global |= incoming.is_global;
                for page in incoming.appears_on_pages {
                    if !existing.appears_on_pages.contains(&page) {
                        existing.appears_on_pages.push(page);
                    }
                }
            }
            None => {
                if incoming.appears_on_pages.is_empty() {
                    incoming.appears_on_pages.push(incoming.origin_page.clone());
                }
                self.index
                    .insert(incoming.fingerprint.clone(), self.features.len());
                self.features.push(incoming);
            }
        }

        self
    }
}

fn finalize(mut features: Vec<Feature>) -> Vec<Feature> {
    for feature in &mut features {
        feature.is_global = feature.is_global || feature.appears_on_pages.len() > 1;
    }
    features
}
