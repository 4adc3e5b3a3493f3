//! Verifier configuration
//!
//! Defaults hold the values the checks were written against: the app on
//! `localhost:9002`, the Italian UI strings and the fixed artifact names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Browser engine launched by Playwright
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Settings shared by both verifiers: where the app lives and how the
/// browser is started
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Base URL of the running application
    pub base_url: String,

    /// Browser engine
    pub browser: BrowserKind,

    /// Run without a visible window
    pub headless: bool,

    pub viewport: Viewport,

    /// Node executable used to host Playwright
    pub node_binary: PathBuf,

    /// Directory screenshots are written to
    pub artifact_dir: PathBuf,

    /// Upper bound for the browser to come up
    pub launch_timeout: Duration,

    /// Upper bound for a single bridge round trip
    pub command_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9002".to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            viewport: Viewport::default(),
            node_binary: PathBuf::from("node"),
            artifact_dir: PathBuf::from("."),
            launch_timeout: Duration::from_secs(30),
            command_timeout: Duration::from_secs(120),
        }
    }
}

impl DriverConfig {
    /// Join an application path onto the base URL
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        match path {
            "" | "/" => base.to_string(),
            p if p.starts_with('/') => format!("{}{}", base, p),
            p => format!("{}/{}", base, p),
        }
    }

    /// Resolve an artifact file name against the artifact directory.
    /// Absolute paths are returned unchanged.
    pub fn artifact(&self, name: impl AsRef<Path>) -> PathBuf {
        let name = name.as_ref();
        if name.is_absolute() || self.artifact_dir == Path::new(".") {
            name.to_path_buf()
        } else {
            self.artifact_dir.join(name)
        }
    }
}

/// Category-order check on the homepage
#[derive(Debug, Clone)]
pub struct CategoryCheck {
    pub path: String,
    pub heading_selector: String,
    /// Text the last heading must contain
    pub marker: String,
    pub navigation: RetryPolicy,
    pub heading_timeout: Duration,
    pub screenshot: PathBuf,
    pub error_screenshot: PathBuf,
}

impl Default for CategoryCheck {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            heading_selector: "h2.font-headline".to_string(),
            marker: "Strumenti".to_string(),
            navigation: RetryPolicy {
                attempts: 10,
                attempt_timeout: Duration::from_secs(10),
                interval: Duration::from_secs(5),
            },
            heading_timeout: Duration::from_secs(60),
            screenshot: PathBuf::from("verification.png"),
            error_screenshot: PathBuf::from("error.png"),
        }
    }
}

/// Accessibility-label check on an experiment page
#[derive(Debug, Clone)]
pub struct A11yCheck {
    pub path: String,
    pub table_selector: String,
    pub table_timeout: Duration,
    /// Visible text of the button that appends a measurement row
    pub add_row_label: String,
    pub input_selector: String,
    pub input_timeout: Duration,
    /// Column label as rendered in the table, symbol included
    pub quantity: String,
    pub row: u32,
    pub screenshot: PathBuf,
    pub error_screenshot: PathBuf,
}

impl Default for A11yCheck {
    fn default() -> Self {
        Self {
            path: "/formula/pendulum".to_string(),
            table_selector: "table".to_string(),
            table_timeout: Duration::from_secs(10),
            add_row_label: "Aggiungi riga".to_string(),
            input_selector: "input[type='number']".to_string(),
            input_timeout: Duration::from_secs(5),
            quantity: "Lunghezza (l)".to_string(),
            row: 1,
            screenshot: PathBuf::from("verification_aria.png"),
            error_screenshot: PathBuf::from("verification_error.png"),
        }
    }
}
