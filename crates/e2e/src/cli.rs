//! Flags and setup shared by the verifier binaries
//!
//! Every flag is optional. Without any, the binaries check the app on
//! `http://localhost:9002` with headless Chromium and write artifacts to the
//! working directory. Flags are the only input; the environment is not read
//! apart from `RUST_LOG`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{BrowserKind, DriverConfig};
use crate::error::E2eResult;
use crate::report::VerificationReport;
use crate::server;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Base URL of the running application
    #[arg(long, default_value = "http://localhost:9002")]
    pub base_url: String,

    /// Browser to use
    #[arg(long, value_enum, default_value = "chromium")]
    pub browser: BrowserKind,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Directory screenshots are written to
    #[arg(long, default_value = ".")]
    pub artifact_dir: PathBuf,

    /// Node executable hosting Playwright
    #[arg(long, default_value = "node")]
    pub node: PathBuf,

    /// Also write a JSON report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Wait up to this many seconds for the server to answer HTTP first
    #[arg(long, value_name = "SECS")]
    pub wait_for_server: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            base_url: self.base_url.clone(),
            browser: self.browser,
            headless: !self.headed,
            node_binary: self.node.clone(),
            artifact_dir: self.artifact_dir.clone(),
            ..Default::default()
        }
    }

    /// Run the opt-in server check
    pub async fn preflight(&self, config: &DriverConfig) -> E2eResult<()> {
        info!("Target: {}", config.base_url);
        match self.wait_for_server {
            Some(secs) => server::wait_until_reachable(&config.base_url, Duration::from_secs(secs)).await,
            None => Ok(()),
        }
    }

    /// Write the JSON report if one was requested. Failures are logged only.
    pub fn write_report(&self, report: &VerificationReport) {
        if let Some(path) = &self.report {
            if let Err(e) = report.write_json(path) {
                tracing::warn!("Failed to write report to {}: {}", path.display(), e);
            }
        }
    }
}

/// Initialize logging on stderr; `RUST_LOG` wins over `--verbose`
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
