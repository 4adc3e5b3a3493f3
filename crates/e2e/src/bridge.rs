//! Wire protocol spoken with the Node side of Playwright
//!
//! Newline-delimited JSON in both directions. Every request carries an `id`
//! and the `op` tag of a [`Command`]; the reply echoes the id.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BrowserKind, DriverConfig};
use crate::error::{E2eError, E2eResult};

/// Node program run with `node -e`
pub const SCRIPT: &str = include_str!("bridge.js");

/// Environment variable carrying [`LaunchSettings`] to the script
pub const CONFIG_ENV: &str = "PHYSLAB_BRIDGE_CONFIG";

/// Id of the reply sent once the browser is up
pub const HANDSHAKE_ID: u64 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchSettings {
    pub browser: BrowserKind,
    pub headless: bool,
    pub width: u32,
    pub height: u32,
}

impl From<&DriverConfig> for LaunchSettings {
    fn from(config: &DriverConfig) -> Self {
        Self {
            browser: config.browser,
            headless: config.headless,
            width: config.viewport.width,
            height: config.viewport.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Goto {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    WaitForSelector {
        selector: String,
        timeout_ms: u64,
    },
    InnerTexts {
        selector: String,
    },
    Click {
        selector: String,
    },
    Count {
        selector: String,
    },
    AttributeValues {
        selector: String,
        name: String,
    },
    Screenshot {
        path: PathBuf,
        full_page: bool,
    },
    Close,
}

impl Command {
    /// Short label for logs and error messages
    pub fn describe(&self) -> String {
        match self {
            Command::Goto { url, .. } => format!("goto:{}", url),
            Command::WaitForSelector { selector, .. } => format!("wait:{}", selector),
            Command::InnerTexts { selector } => format!("inner_texts:{}", selector),
            Command::Click { selector } => format!("click:{}", selector),
            Command::Count { selector } => format!("count:{}", selector),
            Command::AttributeValues { selector, name } => format!("attr:{}@{}", selector, name),
            Command::Screenshot { path, .. } => format!("screenshot:{}", path.display()),
            Command::Close => "close".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub id: u64,
    #[serde(flatten)]
    pub command: &'a Command,
}

impl Request<'_> {
    /// Serialized request terminated by a newline
    pub fn to_line(&self) -> E2eResult<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub id: Option<u64>,
    pub ok: bool,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timeout: bool,
}

impl Response {
    /// Parse one stdout line. Anything that is not a reply (stray console
    /// output from page scripts, blank lines) yields `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str(line) {
            Ok(response) => Some(response),
            Err(e) => {
                debug!("Skipping non-protocol bridge output ({}): {}", e, line);
                None
            }
        }
    }

    /// Turn a reply into the command's value or a typed error
    pub fn into_result(self, command: &Command) -> E2eResult<serde_json::Value> {
        if self.ok {
            return Ok(self.value);
        }
        let timed_out = self.timeout;
        let reason = self.error.unwrap_or_else(|| "unknown error".to_string());
        Err(match command {
            _ if timed_out => E2eError::Timeout(format!("{} ({})", command.describe(), reason)),
            Command::Goto { url, .. } => E2eError::Navigation {
                url: url.clone(),
                reason,
            },
            _ => E2eError::Playwright(format!("{}: {}", command.describe(), reason)),
        })
    }
}
