use thiserror::Error;

use crate::screen::screen_model::PageSnapshot;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Node.js browser server failed to spawn
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe to/from the browser process broke
    #[error("browser session I/O: {0}")]
    SessionIO(String),

    /// Backend answered, but with `ok: false` or a missing payload
    #[error("browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP transport to the remote backend failed (includes timeouts)
    #[error("remote browser request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend needs a credential that was not configured
    #[error("missing browser backend credential: {0}")]
    MissingCredential(String),

    /// No recorded snapshot for the requested page
    #[error("no snapshot recorded for {0}")]
    UnknownPage(String),

    #[error("failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A recorded page was set up to fail on navigation
    #[error("navigation to {0} failed")]
    NavigationFailed(String),
}

/// Everything the analysis core needs from a rendering backend.
///
/// All calls block until the backend answers; implementations bound them
/// with their own timeouts. Selectors are CSS.
pub trait PageDriver {
    /// Load `url` and wait for it to settle.
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Run the extraction script against the current page.
    fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError>;

    fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Number of elements matching `selector`.
    fn query_count(&mut self, selector: &str) -> Result<u32, BrowserError>;

    /// Whether the first element matching `selector` is visible.
    fn query_visible(&mut self, selector: &str) -> Result<bool, BrowserError>;

    /// Text of the first element matching `selector`.
    fn query_text(&mut self, selector: &str) -> Result<Option<String>, BrowserError>;

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;

    fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Click the first visible clickable element whose text is `text`.
    /// `Ok(false)` when nothing matched.
    fn click_text(&mut self, text: &str) -> Result<bool, BrowserError>;

    /// Press Enter with focus in `selector`.
    fn press_enter(&mut self, selector: &str) -> Result<(), BrowserError>;

    fn wait_idle(&mut self, ms: u64) -> Result<(), BrowserError>;
}
