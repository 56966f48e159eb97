use serde::{Deserialize, Serialize};

// ============================================================================
// Output caps for every pipeline stage, kept in one place
// ============================================================================

/// Extraction depth preset. `Quick` keeps rendering-backend cost low;
/// `Thorough` reads more buttons and links per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Quick,
    Thorough,
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(Profile::Quick),
            "thorough" => Ok(Profile::Thorough),
            other => Err(format!("unknown profile '{}' (expected quick or thorough)", other)),
        }
    }
}

/// Per-kind caps for extraction and synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisLimits {
    pub max_forms: usize,
    pub max_tables: usize,
    pub max_buttons: usize,
    pub max_links: usize,
    pub max_navigation: usize,
    pub max_modals: usize,

    pub max_button_cases: usize,
    pub max_link_cases: usize,
    pub max_total_cases: usize,
}

impl AnalysisLimits {
    pub fn for_profile(profile: Profile) -> Self {
        let (max_buttons, max_links) = match profile {
            Profile::Quick => (10, 10),
            Profile::Thorough => (30, 25),
        };

        Self {
            max_forms: 5,
            max_tables: 3,
            max_buttons,
            max_links,
            max_navigation: 2,
            max_modals: 3,
            max_button_cases: 30,
            max_link_cases: 40,
            max_total_cases: 50,
        }
    }
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

/// Optional per-field overrides, as read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LimitOverrides {
    pub max_forms: Option<usize>,
    pub max_tables: Option<usize>,
    pub max_buttons: Option<usize>,
    pub max_links: Option<usize>,
    pub max_navigation: Option<usize>,
    pub max_modals: Option<usize>,
    pub max_button_cases: Option<usize>,
    pub max_link_cases: Option<usize>,
    pub max_total_cases: Option<usize>,
}

impl LimitOverrides {
    pub fn apply(&self, mut limits: AnalysisLimits) -> AnalysisLimits {
        limits.max_forms = self.max_forms.unwrap_or(limits.max_forms);
        limits.max_tables = self.max_tables.unwrap_or(limits.max_tables);
        limits.max_buttons = self.max_buttons.unwrap_or(limits.max_buttons);
        limits.max_links = self.max_links.unwrap_or(limits.max_links);
        limits.max_navigation = self.max_navigation.unwrap_or(limits.max_navigation);
        limits.max_modals = self.max_modals.unwrap_or(limits.max_modals);
        limits.max_button_cases = self.max_button_cases.unwrap_or(limits.max_button_cases);
        limits.max_link_cases = self.max_link_cases.unwrap_or(limits.max_link_cases);
        limits.max_total_cases = self.max_total_cases.unwrap_or(limits.max_total_cases);
        limits
    }
}
