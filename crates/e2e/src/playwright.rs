//! Playwright browser automation
//!
//! A single long-lived `node` process hosts Playwright and the page. The
//! verifiers talk to it through the line protocol in [`crate::bridge`], one
//! command at a time.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::bridge::{self, Command, LaunchSettings, Request, Response};
use crate::config::DriverConfig;
use crate::driver::PageDriver;
use crate::error::{E2eError, E2eResult};

/// How long a closing bridge gets before it is killed
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Playwright-backed page
pub struct PlaywrightDriver {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
    command_timeout: Duration,
    closed: bool,
}

impl PlaywrightDriver {
    /// Start a browser and open a fresh page
    pub async fn launch(config: &DriverConfig) -> E2eResult<Self> {
        Self::check_playwright_installed().await?;
        Self::spawn_bridge(config).await
    }

    /// Spawn the node bridge and wait for its handshake
    async fn spawn_bridge(config: &DriverConfig) -> E2eResult<Self> {
        let settings = serde_json::to_string(&LaunchSettings::from(config))?;
        info!(
            "Launching {} (headless: {})",
            config.browser.as_str(),
            config.headless
        );

        let mut child = TokioCommand::new(&config.node_binary)
            .arg("-e")
            .arg(bridge::SCRIPT)
            .env(bridge::CONFIG_ENV, settings)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                E2eError::Launch(format!(
                    "failed to spawn {}: {}",
                    config.node_binary.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Launch("bridge stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Launch("bridge stdout not captured".to_string()))?;

        let mut driver = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: bridge::HANDSHAKE_ID + 1,
            command_timeout: config.command_timeout,
            closed: false,
        };

        let handshake = timeout(config.launch_timeout, driver.read_reply(bridge::HANDSHAKE_ID))
            .await
            .map_err(|_| {
                E2eError::Launch(format!(
                    "browser did not start within {}s",
                    config.launch_timeout.as_secs()
                ))
            })??;

        if !handshake.ok {
            return Err(E2eError::Launch(
                handshake
                    .error
                    .unwrap_or_else(|| "unknown launch failure".to_string()),
            ));
        }

        debug!("Bridge ready (pid: {:?})", driver.child.id());
        Ok(driver)
    }

    /// Check if Playwright is installed
    async fn check_playwright_installed() -> E2eResult<()> {
        let status = playwright_version_command().status().await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Read stdout until the reply with `id` shows up
    async fn read_reply(&mut self, id: u64) -> E2eResult<Response> {
        loop {
            let line = self.stdout.next_line().await?.ok_or_else(|| {
                E2eError::Bridge("bridge exited before replying".to_string())
            })?;

            match Response::parse_line(&line) {
                Some(response) if response.id == Some(id) => return Ok(response),
                Some(response) => {
                    warn!(
                        "Ignoring reply for id {:?} while waiting for {}",
                        response.id, id
                    );
                }
                None => {}
            }
        }
    }

    /// Send a command and wait for its reply
    async fn send(&mut self, command: Command) -> E2eResult<serde_json::Value> {
        if self.closed {
            return Err(E2eError::Bridge(format!(
                "{} after the browser was closed",
                command.describe()
            )));
        }

        let id = self.next_id;
        self.next_id += 1;
        debug!("-> [{}] {}", id, command.describe());

        let line = Request { id, command: &command }.to_line()?;
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        let response = timeout(self.command_timeout, self.read_reply(id))
            .await
            .map_err(|_| {
                E2eError::Timeout(format!(
                    "bridge reply to {} after {}s",
                    command.describe(),
                    self.command_timeout.as_secs()
                ))
            })??;

        response.into_result(&command)
    }

    async fn send_as<T: DeserializeOwned>(&mut self, command: Command) -> E2eResult<T> {
        let value = self.send(command).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// `npx playwright --version` that never installs or prompts
fn playwright_version_command() -> TokioCommand {
    let mut command = TokioCommand::new("npx");
    command
        .args(["--no-install", "playwright", "--version"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// Absolute form of an artifact path for the bridge, whose working directory
/// may differ. Paths arrive already placed under the artifact directory.
fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

#[async_trait]
impl PageDriver for PlaywrightDriver {
    async fn goto(&mut self, url: &str, timeout: Option<Duration>) -> E2eResult<()> {
        self.send(Command::Goto {
            url: url.to_string(),
            timeout_ms: timeout.map(millis),
        })
        .await?;
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> E2eResult<()> {
        self.send(Command::WaitForSelector {
            selector: selector.to_string(),
            timeout_ms: millis(timeout),
        })
        .await?;
        Ok(())
    }

    async fn inner_texts(&mut self, selector: &str) -> E2eResult<Vec<String>> {
        self.send_as(Command::InnerTexts {
            selector: selector.to_string(),
        })
        .await
    }

    async fn click(&mut self, selector: &str) -> E2eResult<()> {
        self.send(Command::Click {
            selector: selector.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn count(&mut self, selector: &str) -> E2eResult<usize> {
        self.send_as(Command::Count {
            selector: selector.to_string(),
        })
        .await
    }

    async fn attribute_values(
        &mut self,
        selector: &str,
        name: &str,
    ) -> E2eResult<Vec<Option<String>>> {
        self.send_as(Command::AttributeValues {
            selector: selector.to_string(),
            name: name.to_string(),
        })
        .await
    }

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> E2eResult<()> {
        let path = resolve(path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        self.send(Command::Screenshot { path, full_page }).await?;
        Ok(())
    }

    async fn close(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }

        // A broken pipe here just means the bridge is already gone
        if let Err(e) = self.send(Command::Close).await {
            debug!("Close request failed: {}", e);
        }
        self.closed = true;

        match timeout(CLOSE_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!("Bridge exited with {}", status);
            }
            Ok(Err(e)) => {
                warn!("Waiting for bridge failed: {}", e);
                self.child.kill().await?;
            }
            Err(_) => {
                warn!("Bridge did not exit within {}s, killing it", CLOSE_GRACE.as_secs());
                self.child.kill().await?;
            }
        }

        info!("Browser closed");
        Ok(())
    }
}

impl Drop for PlaywrightDriver {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.child.start_kill();
        }
    }
}
