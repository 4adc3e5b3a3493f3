//! Verdict transcript and JSON reports
//!
//! The transcript is the human-readable output of a run and goes to stdout.
//! Diagnostics go through `tracing` to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::E2eResult;

/// Line-oriented transcript writer
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one line. A broken stdout must not abort a verification run.
    pub fn line(&mut self, message: impl AsRef<str>) {
        let result = writeln!(self.out, "{}", message.as_ref()).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to write report line: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Outcome of one assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: None,
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

/// Result of one verifier run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub name: String,
    pub success: bool,
    pub checks: Vec<CheckResult>,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

impl VerificationReport {
    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        info!("Report written to: {}", path.display());
        Ok(())
    }
}

/// Accumulates checks while a verifier runs
#[derive(Debug)]
pub struct ReportBuilder {
    name: String,
    started: Instant,
    checks: Vec<CheckResult>,
    error: Option<String>,
    screenshot: Option<PathBuf>,
}

impl ReportBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            checks: Vec::new(),
            error: None,
            screenshot: None,
        }
    }

    pub fn check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn screenshot(&mut self, path: impl Into<PathBuf>) {
        self.screenshot = Some(path.into());
    }

    pub fn finish(self) -> VerificationReport {
        let success = self.error.is_none() && self.checks.iter().all(|c| c.passed);
        VerificationReport {
            name: self.name,
            success,
            checks: self.checks,
            error: self.error,
            screenshot: self.screenshot,
            duration_ms: self.started.elapsed().as_millis() as u64,
            finished_at: Utc::now(),
        }
    }
}
