use std::fmt;

use serde::{Deserialize, Serialize};

/// A synthesized manual/automated test-case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// `TC-001`, ... assigned after the final ordering. Not stable across runs.
    pub id: String,
    pub title: String,
    pub preconditions: Vec<String>,
    pub steps: Vec<TestStep>,
    pub expected_results: Vec<String>,
    pub priority: Priority,
    pub category: String,
    pub scope: Scope,
    pub affected_pages: Vec<String>,
    pub test_type: TestType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Global,
    #[serde(rename = "Page-specific")]
    PageSpecific,
}

impl Scope {
    pub fn from_global(is_global: bool) -> Self {
        if is_global {
            Scope::Global
        } else {
            Scope::PageSpecific
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("Global"),
            Scope::PageSpecific => f.write_str("Page-specific"),
        }
    }
}

/// Manual cases are prose-only; automated ones carry structured steps a
/// runner can replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestType {
    Manual,
    Automated,
}

/// A step is either free text for a human tester or a structured action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestStep {
    Text(String),
    Action(StepAction),
}

impl TestStep {
    pub fn text(s: impl Into<String>) -> Self {
        TestStep::Text(s.into())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, TestStep::Action(_))
    }
}

impl fmt::Display for TestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStep::Text(s) => f.write_str(s),
            TestStep::Action(StepAction::Navigate { url }) => write!(f, "Navigate to {}", url),
            TestStep::Action(StepAction::Fill { field, value }) => {
                write!(f, "Fill \"{}\" with \"{}\"", field, value)
            }
            TestStep::Action(StepAction::Click { label }) => write!(f, "Click \"{}\"", label),
            TestStep::Action(StepAction::Verify { expectation }) => {
                write!(f, "Verify {}", expectation)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    Navigate { url: String },
    Fill { field: String, value: String },
    Click { label: String },
    Verify { expectation: String },
}

impl From<StepAction> for TestStep {
    fn from(action: StepAction) -> Self {
        TestStep::Action(action)
    }
}
