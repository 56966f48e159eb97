use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::screen::screen_model::PageSnapshot;

use super::driver::{BrowserError, PageDriver};
use super::protocol::{BrowserRequest, BrowserResponse};

pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://chrome.browserless.io";
pub const TOKEN_ENV: &str = "BROWSER_TOKEN";
pub const ENDPOINT_ENV: &str = "BROWSER_ENDPOINT";

#[derive(Serialize)]
struct CreateSession {
    #[serde(rename = "navigationTimeoutMs")]
    navigation_timeout_ms: u64,
}

/// A metered headless browser reached over HTTP.
///
/// One remote session is opened per `RemoteBrowser`, so a login performed
/// through it carries over to every later `navigate`. Each command is a
/// POST of the same JSON body the local server reads from stdin.
pub struct RemoteBrowser {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: String,
    session_id: String,
    navigation_timeout_ms: u64,
}

impl RemoteBrowser {
    /// Open a remote session. Fails with `MissingCredential` before any
    /// network traffic when no token is available.
    pub fn connect(
        endpoint: &str,
        token: Option<&str>,
        request_timeout: Duration,
        navigation_timeout_ms: u64,
    ) -> Result<Self, BrowserError> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => return Err(BrowserError::MissingCredential(TOKEN_ENV.into())),
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        let response: BrowserResponse = client
            .post(format!("{}/sessions", endpoint))
            .query(&[("token", token.as_str())])
            .json(&CreateSession {
                navigation_timeout_ms,
            })
            .send()?
            .error_for_status()?
            .json()?;

        let response = response.into_result("create_session")?;
        let session_id = response
            .session_id
            .ok_or_else(|| BrowserError::SessionProtocol {
                command: "create_session".into(),
                error: "No sessionId in response".into(),
            })?;

        debug!(endpoint = %endpoint, session_id = %session_id, "remote browser session opened");

        Ok(RemoteBrowser {
            client,
            endpoint,
            token,
            session_id,
            navigation_timeout_ms,
        })
    }

    fn send_ok(&self, request: &BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        let response: BrowserResponse = self
            .client
            .post(format!(
                "{}/sessions/{}/commands",
                self.endpoint, self.session_id
            ))
            .query(&[("token", self.token.as_str())])
            .json(request)
            .send()?
            .error_for_status()?
            .json()?;
        response.into_result(request.command_name())
    }

    /// Close the remote session. The backend bills until this is called or
    /// its own idle timeout fires.
    pub fn close(&self) -> Result<(), BrowserError> {
        self.client
            .delete(format!("{}/sessions/{}", self.endpoint, self.session_id))
            .query(&[("token", self.token.as_str())])
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

impl PageDriver for RemoteBrowser {
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
        Ok(self
            .send_ok(&BrowserRequest::query_count(selector))?
            .count
            .unwrap_or(0))
    }

    fn query_visible(&mut self, selector: &str) -> Result<bool, BrowserError> {
        Ok(self
            .send_ok(&BrowserRequest::query_visible(selector))?
            .visible
            .unwrap_or(false))
    }

    fn query_text(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.send_ok(&BrowserRequest::query_text(selector))?.text)
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
        Ok(self
            .send_ok(&BrowserRequest::click_text(text))?
            .clicked
            .unwrap_or(false))
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

impl Drop for RemoteBrowser {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!(error = %e, "remote browser session not closed cleanly");
        }
    }
}
