use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::analysis::error::AnalysisError;
use crate::analysis::pipeline::{Analyzer, analyze_snapshots};
use crate::analysis::request::{AnalysisRequest, AnalysisResponse};
use crate::browser::driver::{BrowserError, PageDriver};
use crate::browser::remote::RemoteBrowser;
use crate::browser::session::BrowserSession;
use crate::browser::snapshot_driver::SnapshotDriver;
use crate::cli::config::{
    AnalyzeArgs, AppConfig, BrowserConfig, resolve_endpoint, resolve_limits, resolve_token,
};
use crate::login::login_model::LoginConfig;
use crate::report::console::format_console_report;

// ============================================================================
// analyze subcommand
// ============================================================================

/// Analyze the requested pages and write the response. Returns the
/// response's `success` flag.
pub fn cmd_analyze(args: &AnalyzeArgs, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let limits = resolve_limits(args.profile.as_deref(), &config.limits)?;
    let format = args.format.as_deref().unwrap_or(&config.output.format);
    let output = args.output.as_deref().or(config.output.path.as_deref());

    let response = match prepare(args, config) {
        Ok((request, mut driver)) => {
            let analyzer = Analyzer::new(limits, config.analysis.clone());
            analyzer.analyze(&request, driver.as_mut())
        }
        Err(e) => {
            if e.is_rejection() {
                info!(kind = e.kind(), error = %e, "request rejected");
            } else {
                warn!(kind = e.kind(), error = %e, "browser backend unavailable");
            }
            AnalysisResponse::failed(&e, 0, None)
        }
    };

    let rendered = render_response(&response, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(path, tests = response.tests.len(), "wrote test cases");
        }
        None => print!("{}", rendered),
    }

    Ok(response.success)
}

/// Everything that can reject a request before a page is loaded: input
/// first, then the backend configuration.
fn prepare(
    args: &AnalyzeArgs,
    config: &AppConfig,
) -> Result<(AnalysisRequest, Box<dyn PageDriver>), AnalysisError> {
    let request = build_request(args)?;
    request.validate()?;

    let backend = args.backend.as_deref().unwrap_or(&config.browser.backend);
    let snapshots = args.snapshots.as_deref().or(config.browser.snapshots.as_deref());
    let driver = build_driver(backend, &config.browser, snapshots)?;

    Ok((request, driver))
}

/// Assemble the request from a JSON file and/or CLI flags. Flags fill in
/// or override what the file says.
pub fn build_request(args: &AnalyzeArgs) -> Result<AnalysisRequest, AnalysisError> {
    let mut request = match &args.request {
        Some(path) => load_request(Path::new(path))?,
        None => AnalysisRequest::default(),
    };

    request.urls.extend(args.urls.iter().cloned());

    if let Some(login_url) = &args.login_url {
        let login = request.login_config.get_or_insert_with(LoginConfig::default);
        login.login_url = login_url.clone();
    }

    if let Some(login) = request.login_config.as_mut() {
        if args.username.is_some() {
            login.username = args.username.clone();
        }
        if args.password.is_some() {
            login.password = args.password.clone();
        }
        if args.username_field.is_some() {
            login.username_field = args.username_field.clone();
        }
        if args.password_field.is_some() {
            login.password_field = args.password_field.clone();
        }
    } else if args.username.is_some() || args.password.is_some() {
        return Err(AnalysisError::Input(
            "--username/--password need --login-url".into(),
        ));
    }

    Ok(request)
}

pub fn load_request(path: &Path) -> Result<AnalysisRequest, AnalysisError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AnalysisError::Input(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AnalysisError::Input(format!("malformed request {}: {}", path.display(), e)))
}

/// Open the page loader named by `backend`.
pub fn build_driver(
    backend: &str,
    browser: &BrowserConfig,
    snapshots: Option<&str>,
) -> Result<Box<dyn PageDriver>, AnalysisError> {
    debug!(backend, "opening browser backend");

    match backend {
        "local" => {
            let session = BrowserSession::launch(&browser.server_script, browser.navigation_timeout_ms)?;
            Ok(Box::new(session))
        }
        "remote" => {
            let endpoint = resolve_endpoint(browser);
            let token = resolve_token();
            let remote = RemoteBrowser::connect(
                &endpoint,
                token.as_deref(),
                Duration::from_secs(browser.timeout_secs),
                browser.navigation_timeout_ms,
            )
            .map_err(|e| match e {
                BrowserError::MissingCredential(_) => AnalysisError::Configuration(e.to_string()),
                other => AnalysisError::Browser(other),
            })?;
            Ok(Box::new(remote))
        }
        "snapshot" => {
            let dir = snapshots.ok_or_else(|| {
                AnalysisError::Configuration("snapshot backend needs --snapshots <dir>".into())
            })?;
            Ok(Box::new(SnapshotDriver::from_dir(Path::new(dir))?))
        }
        other => Err(AnalysisError::Configuration(format!(
            "unknown backend '{}' (expected local, remote or snapshot)",
            other
        ))),
    }
}

pub fn render_response(
    response: &AnalysisResponse,
    format: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let rendered = match format {
        "yaml" => serde_yaml::to_string(response)?,
        "console" => format_console_report(response),
        _ => {
            let mut json = serde_json::to_string_pretty(response)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

// ============================================================================
// features subcommand
// ============================================================================

/// Print the reconciled, classified features of recorded snapshots as JSON.
pub fn cmd_features(
    snapshot_paths: &[String],
    profile: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let limits = resolve_limits(profile, &config.limits)?;

    let mut snapshots = Vec::with_capacity(snapshot_paths.len());
    for path in snapshot_paths {
        snapshots.push(SnapshotDriver::read_snapshot(Path::new(path))?);
    }

    let features = analyze_snapshots(&snapshots, &limits);
    info!(pages = snapshots.len(), features = features.len(), "features detected");

    println!("{}", serde_json::to_string_pretty(&features)?);
    Ok(())
}
