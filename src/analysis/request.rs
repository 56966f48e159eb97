use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::login::login_model::LoginConfig;
use crate::synth::test_case::TestCase;

use super::error::AnalysisError;

// ============================================================================
// Request payload
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub login_config: Option<LoginConfig>,
}

impl AnalysisRequest {
    pub fn for_url(url: &str) -> Self {
        AnalysisRequest {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn with_login(mut self, login: LoginConfig) -> Self {
        self.login_config = Some(login);
        self
    }

    /// Every page to analyze, in request order (`url`, then `urls`, then
    /// `pages`), blanks dropped and duplicates removed.
    pub fn target_urls(&self) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        let all = self
            .url
            .iter()
            .chain(self.urls.iter())
            .chain(self.pages.iter());

        for url in all {
            let url = url.trim();
            if !url.is_empty() && !targets.iter().any(|t| t == url) {
                targets.push(url.to_string());
            }
        }
        targets
    }

    /// Reject requests that cannot be analyzed at all.
    pub fn validate(&self) -> Result<Vec<String>, AnalysisError> {
        let targets = self.target_urls();
        if targets.is_empty() {
            return Err(AnalysisError::Input("no URL provided".into()));
        }

        if let Some(login) = &self.login_config {
            if login.login_url.trim().is_empty() {
                return Err(AnalysisError::Input("loginConfig.loginUrl is empty".into()));
            }
            if login.credentials().is_none() {
                return Err(AnalysisError::Input(
                    "loginConfig needs username and password".into(),
                ));
            }
        }

        Ok(targets)
    }
}

// ============================================================================
// Response payload
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default)]
    pub tests: Vec<TestCase>,
    #[serde(default)]
    pub pages_analyzed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Diagnostic detail for failures; never part of the success decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

impl AnalysisResponse {
    pub fn succeeded(tests: Vec<TestCase>, pages_analyzed: usize, login_success: Option<bool>) -> Self {
        AnalysisResponse {
            success: true,
            tests,
            pages_analyzed,
            login_success,
            message: None,
            debug: None,
        }
    }

    /// Structured failure body. `tests` is always empty.
    pub fn failed(
        error: &AnalysisError,
        pages_analyzed: usize,
        login_success: Option<bool>,
    ) -> Self {
        let mut debug = serde_json::json!({ "kind": error.kind() });
        if let AnalysisError::Login(reason) = error {
            debug["reason"] = Value::String(reason.to_string());
        }

        AnalysisResponse {
            success: false,
            tests: Vec::new(),
            pages_analyzed,
            login_success,
            message: Some(error.to_string()),
            debug: Some(debug),
        }
    }
}
