use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::driver::BrowserError;

/// One command to the browser backend. Serialized as a single JSON object;
/// the local server reads them as NDJSON, the remote backend as POST bodies.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
        #[serde(rename = "timeoutMs")]
        timeout_ms: u64,
    },
    Extract {
        cmd: &'static str,
    },
    Action {
        cmd: &'static str,
        action: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    CurrentUrl {
        cmd: &'static str,
    },
    QueryText {
        cmd: &'static str,
        selector: String,
    },
    QueryVisible {
        cmd: &'static str,
        selector: String,
    },
    QueryCount {
        cmd: &'static str,
        selector: String,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str, timeout_ms: u64) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
            timeout_ms,
        }
    }

    pub fn extract() -> Self {
        BrowserRequest::Extract { cmd: "extract" }
    }

    pub fn fill(selector: &str, value: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "fill".into(),
            selector: Some(selector.to_string()),
            value: Some(value.to_string()),
            text: None,
            duration_ms: None,
        }
    }

    pub fn click(selector: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "click".into(),
            selector: Some(selector.to_string()),
            value: None,
            text: None,
            duration_ms: None,
        }
    }

    pub fn click_text(text: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "click_text".into(),
            selector: None,
            value: None,
            text: Some(text.to_string()),
            duration_ms: None,
        }
    }

    pub fn press_enter(selector: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "press".into(),
            selector: Some(selector.to_string()),
            value: Some("Enter".into()),
            text: None,
            duration_ms: None,
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "wait".into(),
            selector: None,
            value: None,
            text: None,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn current_url() -> Self {
        BrowserRequest::CurrentUrl { cmd: "current_url" }
    }

    pub fn query_text(selector: &str) -> Self {
        BrowserRequest::QueryText {
            cmd: "query_text",
            selector: selector.to_string(),
        }
    }

    pub fn query_visible(selector: &str) -> Self {
        BrowserRequest::QueryVisible {
            cmd: "query_visible",
            selector: selector.to_string(),
        }
    }

    pub fn query_count(selector: &str) -> Self {
        BrowserRequest::QueryCount {
            cmd: "query_count",
            selector: selector.to_string(),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }

    /// The `cmd` tag, for error messages.
    pub fn command_name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { cmd, .. }
            | BrowserRequest::Extract { cmd }
            | BrowserRequest::Action { cmd, .. }
            | BrowserRequest::CurrentUrl { cmd }
            | BrowserRequest::QueryText { cmd, .. }
            | BrowserRequest::QueryVisible { cmd, .. }
            | BrowserRequest::QueryCount { cmd, .. }
            | BrowserRequest::Quit { cmd } => *cmd,
        }
    }
}

/// Response from the browser backend (one JSON object per request).
#[derive(Debug, Default, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub clicked: Option<bool>,
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
}

impl BrowserResponse {
    /// Turn `ok: false` into an error tagged with the command that failed.
    pub fn into_result(self, command: &str) -> Result<Self, BrowserError> {
        if self.ok {
            Ok(self)
        } else {
            Err(BrowserError::SessionProtocol {
                command: command.into(),
                error: self.error.unwrap_or_else(|| "Unknown error".into()),
            })
        }
    }
}
