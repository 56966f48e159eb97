use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::browser::driver::PageDriver;
use crate::config::limits::AnalysisLimits;
use crate::feature::classifier::classify_all;
use crate::feature::extractor::extract_features;
use crate::feature::feature_model::Feature;
use crate::login::login_model::{
    LoginConfig, LoginFailure, LoginNavigationPolicy, LoginOutcome,
};
use crate::login::orchestrator::{DEFAULT_LOGIN_SETTLE_MS, LoginOrchestrator};
use crate::reconcile::reconciler::{PageFeatures, reconcile};
use crate::screen::screen_model::PageSnapshot;
use crate::synth::synthesizer::{SynthesisContext, synthesize};
use crate::synth::test_case::TestCase;

use super::error::AnalysisError;
use super::request::{AnalysisRequest, AnalysisResponse};

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Outer bound on one whole request
    pub timeout_secs: u64,
    /// Extra wait after each page navigation before extraction
    pub page_settle_ms: u64,
    /// Wait after submitting the login form before verifying it
    pub login_settle_ms: u64,
    pub on_login_navigation_failure: LoginNavigationPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            page_settle_ms: 500,
            login_settle_ms: DEFAULT_LOGIN_SETTLE_MS,
            on_login_navigation_failure: LoginNavigationPolicy::Abort,
        }
    }
}

/// How far a request got; reported even when it fails.
#[derive(Debug, Clone, Default)]
struct Progress {
    pages_analyzed: usize,
    login_success: Option<bool>,
}

// ============================================================================
// Analyzer
// ============================================================================

/// One analysis request, end to end: optional login, a sequential page
/// loop over a single driver, reconciliation, synthesis.
///
/// Pages are visited one at a time on purpose: they share the driver's
/// session (and its login cookies).
pub struct Analyzer {
    pub limits: AnalysisLimits,
    pub options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(limits: AnalysisLimits, options: AnalysisOptions) -> Self {
        Self { limits, options }
    }

    /// Run the request and fold every outcome into a response body.
    pub fn analyze(&self, request: &AnalysisRequest, driver: &mut dyn PageDriver) -> AnalysisResponse {
        let mut progress = Progress::default();

        match self.run(request, driver, &mut progress) {
            Ok(tests) => {
                info!(
                    tests = tests.len(),
                    pages = progress.pages_analyzed,
                    "analysis complete"
                );
                AnalysisResponse::succeeded(tests, progress.pages_analyzed, progress.login_success)
            }
            Err(e) if e.is_rejection() => {
                info!(kind = e.kind(), error = %e, "request rejected");
                AnalysisResponse::failed(&e, progress.pages_analyzed, progress.login_success)
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "analysis failed");
                AnalysisResponse::failed(&e, progress.pages_analyzed, progress.login_success)
            }
        }
    }

    fn run(
        &self,
        request: &AnalysisRequest,
        driver: &mut dyn PageDriver,
        progress: &mut Progress,
    ) -> Result<Vec<TestCase>, AnalysisError> {
        let targets = request.validate()?;
        let timeout = Duration::from_secs(self.options.timeout_secs);
        let deadline = Instant::now() + timeout;

        let mut context = SynthesisContext::default();
        if let Some(login) = &request.login_config {
            let authenticated = self
                .login(login, driver)
                .inspect_err(|_| progress.login_success = Some(false))?;
            progress.login_success = Some(authenticated);
            context.authenticated = authenticated;
        }

        let mut pages: Vec<PageFeatures> = Vec::with_capacity(targets.len());

        for url in &targets {
            if Instant::now() >= deadline {
                return Err(AnalysisError::Timeout(timeout));
            }

            match self.load_page(url, driver) {
                Ok(snapshot) => {
                    let features = page_features(&snapshot, &self.limits);
                    info!(url = %url, features = features.len(), "page analyzed");
                    pages.push(PageFeatures::new(&snapshot.url, features));
                    progress.pages_analyzed += 1;
                }
                Err(e) => warn!(url = %url, error = %e, "skipping page"),
            }
        }

        if pages.is_empty() {
            return Err(AnalysisError::Navigation(format!(
                "all {} page(s) failed to load",
                targets.len()
            )));
        }

        let features = reconcile(&pages);
        if features.is_empty() {
            return Err(AnalysisError::EmptyResult { pages: pages.len() });
        }

        if Instant::now() >= deadline {
            return Err(AnalysisError::Timeout(timeout));
        }

        Ok(synthesize(&features, &self.limits, &context))
    }

    /// Returns whether the session is authenticated afterwards. Only a
    /// login page that fails to load can be tolerated, and only when the
    /// policy says so.
    fn login(&self, login: &LoginConfig, driver: &mut dyn PageDriver) -> Result<bool, AnalysisError> {
        let mut orchestrator =
            LoginOrchestrator::new(login).with_settle_ms(self.options.login_settle_ms);

        match orchestrator.run(driver) {
            LoginOutcome::Success => Ok(true),
            LoginOutcome::Failure(LoginFailure::NavigationFailed(reason))
                if self.options.on_login_navigation_failure
                    == LoginNavigationPolicy::ProceedUnauthenticated =>
            {
                warn!(reason = %reason, "login page unavailable, continuing unauthenticated");
                Ok(false)
            }
            LoginOutcome::Failure(reason) => {
                debug!(
                    states = ?orchestrator.history().iter().map(|s| s.name()).collect::<Vec<_>>(),
                    "login history"
                );
                Err(AnalysisError::Login(reason))
            }
        }
    }

    fn load_page(
        &self,
        url: &str,
        driver: &mut dyn PageDriver,
    ) -> Result<PageSnapshot, AnalysisError> {
        driver.navigate(url)?;

        if self.options.page_settle_ms > 0 {
            if let Err(e) = driver.wait_idle(self.options.page_settle_ms) {
                debug!(url, error = %e, "settle wait failed");
            }
        }

        let mut snapshot = driver.snapshot()?;
        if snapshot.url.is_empty() {
            snapshot.url = url.to_string();
        }
        Ok(snapshot)
    }
}

// ============================================================================
// Offline helpers
// ============================================================================

/// Extract and classify the features of one page.
pub fn page_features(snapshot: &PageSnapshot, limits: &AnalysisLimits) -> Vec<Feature> {
    classify_all(extract_features(snapshot, limits))
}

/// Extract, classify and reconcile a batch of already captured pages.
pub fn analyze_snapshots(snapshots: &[PageSnapshot], limits: &AnalysisLimits) -> Vec<Feature> {
    let pages: Vec<PageFeatures> = snapshots
        .iter()
        .map(|s| PageFeatures::new(&s.url, page_features(s, limits)))
        .collect();
    reconcile(&pages)
}
