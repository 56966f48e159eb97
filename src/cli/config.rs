use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::pipeline::AnalysisOptions;
use crate::browser::remote::{DEFAULT_REMOTE_ENDPOINT, ENDPOINT_ENV, TOKEN_ENV};
use crate::browser::session::DEFAULT_SERVER_SCRIPT;
use crate::config::limits::{AnalysisLimits, LimitOverrides, Profile};

pub const DEFAULT_CONFIG_FILE: &str = "ui-test-synth.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-test-synth",
    version,
    about = "Detect testable UI features on web pages and write test cases for them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ui-test-synth.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one or more pages and synthesize test cases
    Analyze(AnalyzeArgs),

    /// List the classified features of recorded snapshots
    Features {
        /// Snapshot JSON file (repeatable)
        #[arg(long = "snapshot", required = true)]
        snapshots: Vec<String>,

        /// Extraction profile: quick or thorough
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Page to analyze (repeatable)
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// JSON request file ({url, urls, pages, loginConfig})
    #[arg(long)]
    pub request: Option<String>,

    /// Log in here before analyzing
    #[arg(long)]
    pub login_url: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// CSS selector hint for the username field
    #[arg(long)]
    pub username_field: Option<String>,

    /// CSS selector hint for the password field
    #[arg(long)]
    pub password_field: Option<String>,

    /// Browser backend: local, remote or snapshot
    #[arg(long)]
    pub backend: Option<String>,

    /// Directory of recorded page snapshots (snapshot backend)
    #[arg(long)]
    pub snapshots: Option<String>,

    /// Extraction profile: quick or thorough
    #[arg(long)]
    pub profile: Option<String>,

    /// Output format: json, yaml or console
    #[arg(long)]
    pub format: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ui-test-synth.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub limits: LimitsConfig,
    pub browser: BrowserConfig,
    pub analysis: AnalysisOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub profile: Profile,
    #[serde(flatten)]
    pub overrides: LimitOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserConfig {
    pub backend: String,
    pub server_script: String,
    pub endpoint: Option<String>,
    /// Per-call HTTP timeout for the remote backend
    pub timeout_secs: u64,
    pub navigation_timeout_ms: u64,
    pub snapshots: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            server_script: DEFAULT_SERVER_SCRIPT.to_string(),
            endpoint: None,
            timeout_secs: 60,
            navigation_timeout_ms: 30_000,
            snapshots: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            path: None,
        }
    }
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config file > environment > defaults)
// ============================================================================

/// Limits for a run: the CLI profile wins over the config profile, then the
/// config file's per-field overrides are applied.
pub fn resolve_limits(cli_profile: Option<&str>, config: &LimitsConfig) -> Result<AnalysisLimits, String> {
    let profile = match cli_profile {
        Some(p) => Profile::from_str(p)?,
        None => config.profile,
    };
    Ok(config.overrides.apply(AnalysisLimits::for_profile(profile)))
}

/// Backend endpoint: CLI/config value, then `BROWSER_ENDPOINT`, then the
/// built-in default.
pub fn resolve_endpoint(config: &BrowserConfig) -> String {
    config
        .endpoint
        .clone()
        .or_else(|| std::env::var(ENDPOINT_ENV).ok())
        .unwrap_or_else(|| DEFAULT_REMOTE_ENDPOINT.to_string())
}

/// Backend token from `BROWSER_TOKEN`.
pub fn resolve_token() -> Option<String> {
    std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty())
}
