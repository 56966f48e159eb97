use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::screen::screen_model::PageSnapshot;

use super::driver::{BrowserError, PageDriver};
use super::protocol::{BrowserRequest, BrowserResponse};

pub const DEFAULT_SERVER_SCRIPT: &str = "node/browser_server.js";

/// A persistent browser session backed by a local Node.js browser server.
///
/// Launches a long-lived process that keeps a Chromium browser open, so the
/// cookies set by a login survive across page visits. Commands are sent as
/// NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    navigation_timeout_ms: u64,
}

impl BrowserSession {
    /// Launch a new browser session by spawning `script` under node.
    pub fn launch(script: &str, navigation_timeout_ms: u64) -> Result<Self, BrowserError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| BrowserError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            BrowserError::SessionIO(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            BrowserError::SessionIO(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| BrowserError::SessionIO(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| BrowserError::JsonParse {
                context: format!("{} ready signal", script),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(BrowserError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        debug!(script, "browser session ready");

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            navigation_timeout_ms,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        let json = serde_json::to_string(request).map_err(|e| BrowserError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            BrowserError::SessionIO(format!("Failed to write to browser server stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            BrowserError::SessionIO(format!("Failed to flush browser server stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            BrowserError::SessionIO(format!("Failed to read from browser server stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(BrowserError::SessionIO(
                "Empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| BrowserError::JsonParse {
            context: "browser server response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        self.send(request)?.into_result(request.command_name())
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), BrowserError> {
        // Best-effort: the process may already be gone
        if let Err(e) = self.send(&BrowserRequest::quit()) {
            debug!(error = %e, "quit command not acknowledged");
        }
        if let Err(e) = self.child.wait() {
            warn!(error = %e, "browser server did not exit cleanly");
        }
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.send_ok(&BrowserRequest::navigate(url, self.navigation_timeout_ms))?;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        let response = self.send_ok(&BrowserRequest::extract())?;
        let data = response.data.ok_or_else(|| BrowserError::SessionProtocol {
            command: "extract".into(),
            error: "No data in extract response".into(),
        })?;
        PageSnapshot::from_value(&data).ok_or_else(|| BrowserError::SessionProtocol {
            command: "extract".into(),
            error: "extract response has no 'dom' array".into(),
        })
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        let response = self.send_ok(&BrowserRequest::current_url())?;
        response.url.ok_or_else(|| BrowserError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn query_count(&mut self, selector: &str) -> Result<u32, BrowserError> {
        let response = self.send_ok(&BrowserRequest::query_count(selector))?;
        Ok(response.count.unwrap_or(0))
    }

    fn query_visible(&mut self, selector: &str) -> Result<bool, BrowserError> {
        let response = self.send_ok(&BrowserRequest::query_visible(selector))?;
        Ok(response.visible.unwrap_or(false))
    }

    fn query_text(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        let response = self.send_ok(&BrowserRequest::query_text(selector))?;
        Ok(response.text)
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.send_ok(&BrowserRequest::fill(selector, value))?;
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.send_ok(&BrowserRequest::click(selector))?;
        Ok(())
    }

    fn click_text(&mut self, text: &str) -> Result<bool, BrowserError> {
        let response = self.send_ok(&BrowserRequest::click_text(text))?;
        Ok(response.clicked.unwrap_or(false))
    }

    fn press_enter(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.send_ok(&BrowserRequest::press_enter(selector))?;
        Ok(())
    }

    fn wait_idle(&mut self, ms: u64) -> Result<(), BrowserError> {
        self.send_ok(&BrowserRequest::wait(ms))?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
