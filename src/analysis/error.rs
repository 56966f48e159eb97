use std::time::Duration;

use thiserror::Error;

use crate::browser::driver::BrowserError;
use crate::login::login_model::LoginFailure;

/// Request-level failures. Page-level navigation problems and element-level
/// extraction problems are recovered inside the pipeline and only show up
/// here when they leave nothing to analyze.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The browser backend cannot be used as configured
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request itself is unusable
    #[error("invalid request: {0}")]
    Input(String),

    /// No requested page could be loaded
    #[error("no page could be loaded: {0}")]
    Navigation(String),

    #[error("login failed: {0}")]
    Login(LoginFailure),

    /// Pages loaded but nothing testable was found on any of them
    #[error("no features detected on {pages} analyzed page(s)")]
    EmptyResult { pages: usize },

    #[error("analysis exceeded the {0:?} timeout")]
    Timeout(Duration),

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl AnalysisError {
    /// Short machine-readable tag for the `debug` field of a response.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Configuration(_) => "configuration",
            AnalysisError::Input(_) => "input",
            AnalysisError::Navigation(_) => "navigation",
            AnalysisError::Login(_) => "login",
            AnalysisError::EmptyResult { .. } => "empty_result",
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::Browser(_) => "browser",
        }
    }

    /// Errors that reject the request before any page is loaded.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AnalysisError::Configuration(_) | AnalysisError::Input(_)
        )
    }
}
