use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Login configuration (from the request payload)
// ============================================================================

/// Credentials and optional selector hints for the pre-analysis login.
///
/// Accepts `username`/`password` or the `testUsername`/`testPassword`
/// spellings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginConfig {
    pub login_url: String,
    #[serde(default, alias = "testUsername")]
    pub username: Option<String>,
    #[serde(default, alias = "testPassword")]
    pub password: Option<String>,
    /// CSS selector probed before the built-in username locators
    #[serde(default)]
    pub username_field: Option<String>,
    #[serde(default)]
    pub password_field: Option<String>,
    #[serde(default)]
    pub submit_selector: Option<String>,
}

impl LoginConfig {
    pub fn new(login_url: &str, username: &str, password: &str) -> Self {
        LoginConfig {
            login_url: login_url.to_string(),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    /// Both credentials, when present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

/// What to do when the login page itself cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginNavigationPolicy {
    #[default]
    Abort,
    ProceedUnauthenticated,
}

impl FromStr for LoginNavigationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(LoginNavigationPolicy::Abort),
            "proceed-unauthenticated" | "proceed" => Ok(LoginNavigationPolicy::ProceedUnauthenticated),
            other => Err(format!(
                "unknown login navigation policy '{}' (expected abort or proceed-unauthenticated)",
                other
            )),
        }
    }
}

// ============================================================================
// Login state machine
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum LoginState {
    Idle,
    NavigatedToLogin,
    FieldsLocated {
        username_selector: String,
        password_selector: String,
    },
    Submitted,
    Verified(LoginOutcome),
}

impl LoginState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginState::Verified(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoginState::Idle => "Idle",
            LoginState::NavigatedToLogin => "NavigatedToLogin",
            LoginState::FieldsLocated { .. } => "FieldsLocated",
            LoginState::Submitted => "Submitted",
            LoginState::Verified(_) => "Verified",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success,
    Failure(LoginFailure),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success)
    }
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginOutcome::Success => f.write_str("success"),
            LoginOutcome::Failure(reason) => write!(f, "failure: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoginFailure {
    #[error("no credentials configured")]
    MissingCredentials,

    #[error("login page could not be loaded: {0}")]
    NavigationFailed(String),

    #[error("form not found: {0}")]
    FormNotFound(String),

    /// The browser refused a fill or click
    #[error("login interaction failed: {0}")]
    Interaction(String),

    #[error("login rejected: {0}")]
    Rejected(String),
}
