use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::screen::screen_model::PageSnapshot;
use crate::screen::url::normalize_href;

use super::driver::{BrowserError, PageDriver};

/// What the page answers to selector queries. `SnapshotDriver` keeps one for
/// the current page and can swap in another when a form is submitted.
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    pub counts: HashMap<String, u32>,
    pub visible: HashSet<String>,
    pub texts: HashMap<String, String>,
    /// Texts `click_text` will find.
    pub clickable_texts: HashSet<String>,
}

impl SelectorState {
    pub fn with_element(mut self, selector: &str) -> Self {
        *self.counts.entry(selector.to_string()).or_insert(0) += 1;
        self.visible.insert(selector.to_string());
        self
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self = self.with_element(selector);
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn with_clickable_text(mut self, text: &str) -> Self {
        self.clickable_texts.insert(text.to_string());
        self
    }
}

/// Every interaction the driver received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedAction {
    Navigate(String),
    Fill { selector: String, value: String },
    Click(String),
    ClickText(String),
    PressEnter(String),
    Wait(u64),
}

/// Offline page loader over recorded snapshots.
///
/// Pages are keyed by normalized URL. Selector queries answer from the
/// current `SelectorState`; a click or Enter press moves to the configured
/// post-submit state and URL, which is enough to drive a login.
#[derive(Debug, Default)]
pub struct SnapshotDriver {
    pages: HashMap<String, PageSnapshot>,
    failing: HashSet<String>,
    state: SelectorState,
    after_submit: Option<(SelectorState, Option<String>)>,
    current: Option<String>,
    pub actions: Vec<RecordedAction>,
}

impl SnapshotDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, snapshot: PageSnapshot) -> Self {
        self.add_page(snapshot);
        self
    }

    pub fn add_page(&mut self, snapshot: PageSnapshot) {
        self.pages.insert(normalize_href(&snapshot.url), snapshot);
    }

    /// Navigating to `url` fails as a page load timeout would.
    pub fn with_failing_page(mut self, url: &str) -> Self {
        self.failing.insert(normalize_href(url));
        self
    }

    pub fn with_selectors(mut self, state: SelectorState) -> Self {
        self.state = state;
        self
    }

    /// State and URL the page moves to once something is clicked or Enter
    /// is pressed.
    pub fn with_after_submit(mut self, state: SelectorState, url: Option<&str>) -> Self {
        self.after_submit = Some((state, url.map(str::to_string)));
        self
    }

    /// Load every `*.json` snapshot in `dir`. Files that are not snapshots
    /// are skipped with a warning.
    pub fn from_dir(dir: &Path) -> Result<Self, BrowserError> {
        let mut driver = SnapshotDriver::new();

        let entries = std::fs::read_dir(dir).map_err(|e| BrowserError::SnapshotRead {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            match Self::read_snapshot(&path) {
                Ok(snapshot) => driver.add_page(snapshot),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping snapshot file"),
            }
        }

        debug!(pages = driver.pages.len(), dir = %dir.display(), "snapshots loaded");
        Ok(driver)
    }

    /// Read one snapshot file.
    pub fn read_snapshot(path: &Path) -> Result<PageSnapshot, BrowserError> {
        let content = std::fs::read_to_string(path).map_err(|e| BrowserError::SnapshotRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let raw: Value = serde_json::from_str(&content).map_err(|e| BrowserError::JsonParse {
            context: path.display().to_string(),
            source: e,
        })?;
        PageSnapshot::from_value(&raw).ok_or_else(|| BrowserError::SessionProtocol {
            command: "extract".into(),
            error: format!("{} has no 'dom' array", path.display()),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn submitted(&mut self) {
        if let Some((state, url)) = self.after_submit.take() {
            self.state = state;
            if url.is_some() {
                self.current = url;
            }
        }
    }
}

impl PageDriver for SnapshotDriver {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.actions.push(RecordedAction::Navigate(url.to_string()));

        let key = normalize_href(url);
        if self.failing.contains(&key) {
            return Err(BrowserError::NavigationFailed(url.to_string()));
        }
        if !self.pages.contains_key(&key) {
            return Err(BrowserError::UnknownPage(url.to_string()));
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        let url = self
            .current
            .clone()
            .ok_or_else(|| BrowserError::UnknownPage("(no page loaded)".into()))?;

        let mut snapshot = self
            .pages
            .get(&normalize_href(&url))
            .cloned()
            .ok_or_else(|| BrowserError::UnknownPage(url.clone()))?;
        if snapshot.url.is_empty() {
            snapshot.url = url;
        }
        Ok(snapshot)
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.current.clone().unwrap_or_default())
    }

    fn query_count(&mut self, selector: &str) -> Result<u32, BrowserError> {
        Ok(self.state.counts.get(selector).copied().unwrap_or(0))
    }

    fn query_visible(&mut self, selector: &str) -> Result<bool, BrowserError> {
        Ok(self.state.visible.contains(selector))
    }

    fn query_text(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.state.texts.get(selector).cloned())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.actions.push(RecordedAction::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.actions.push(RecordedAction::Click(selector.to_string()));
        self.submitted();
        Ok(())
    }

    fn click_text(&mut self, text: &str) -> Result<bool, BrowserError> {
        if !self.state.clickable_texts.contains(text) {
            return Ok(false);
        }
        self.actions.push(RecordedAction::ClickText(text.to_string()));
        self.submitted();
        Ok(true)
    }

    fn press_enter(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.actions.push(RecordedAction::PressEnter(selector.to_string()));
        self.submitted();
        Ok(())
    }

    fn wait_idle(&mut self, ms: u64) -> Result<(), BrowserError> {
        self.actions.push(RecordedAction::Wait(ms));
        Ok(())
    }
}
