//! Scripted in-memory page used by the verifier tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use physlab_e2e::{E2eError, E2eResult, PageDriver};

#[derive(Default)]
pub struct ScriptedPage {
    /// Number of leading `goto` calls that fail
    goto_failures: usize,
    slow_selectors: Vec<String>,
    texts: HashMap<String, Vec<String>>,
    counts: HashMap<String, usize>,
    attributes: HashMap<String, Vec<Option<String>>>,
    fail_clicks: bool,
    fail_screenshots: bool,

    pub gotos: Vec<(String, Option<Duration>)>,
    pub waits: Vec<(String, Duration)>,
    pub clicks: Vec<String>,
    pub counted: Vec<String>,
    pub screenshots: Vec<(PathBuf, bool)>,
    pub close_calls: usize,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_gotos(mut self, n: usize) -> Self {
        self.goto_failures = n;
        self
    }

    pub fn unreachable(self) -> Self {
        self.failing_gotos(usize::MAX)
    }

    /// `wait_for_selector(selector)` times out
    pub fn never_shows(mut self, selector: &str) -> Self {
        self.slow_selectors.push(selector.to_string());
        self
    }

    pub fn with_texts(mut self, selector: &str, texts: &[&str]) -> Self {
        self.texts.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_count(mut self, selector: &str, count: usize) -> Self {
        self.counts.insert(selector.to_string(), count);
        self
    }

    pub fn with_attributes(mut self, selector: &str, values: &[Option<&str>]) -> Self {
        self.attributes.insert(
            selector.to_string(),
            values.iter().map(|v| v.map(String::from)).collect(),
        );
        self
    }

    pub fn failing_clicks(mut self) -> Self {
        self.fail_clicks = true;
        self
    }

    /// Screenshots fail, as they would on a dead page
    pub fn failing_screenshots(mut self) -> Self {
        self.fail_screenshots = true;
        self
    }

    pub fn closed(&self) -> bool {
        self.close_calls > 0
    }

    fn ensure_open(&self, op: &str) -> E2eResult<()> {
        if self.closed() {
            return Err(E2eError::Bridge(format!("{} after the browser was closed", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn goto(&mut self, url: &str, timeout: Option<Duration>) -> E2eResult<()> {
        self.ensure_open("goto")?;
        self.gotos.push((url.to_string(), timeout));
        if self.gotos.len() <= self.goto_failures {
            return Err(E2eError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> E2eResult<()> {
        self.ensure_open("wait")?;
        self.waits.push((selector.to_string(), timeout));
        if self.slow_selectors.iter().any(|s| s == selector) {
            return Err(E2eError::Timeout(format!(
                "wait:{} (Timeout {}ms exceeded.)",
                selector,
                timeout.as_millis()
            )));
        }
        Ok(())
    }

    async fn inner_texts(&mut self, selector: &str) -> E2eResult<Vec<String>> {
        self.ensure_open("inner_texts")?;
        Ok(self.texts.get(selector).cloned().unwrap_or_default())
    }

    async fn click(&mut self, selector: &str) -> E2eResult<()> {
        self.ensure_open("click")?;
        self.clicks.push(selector.to_string());
        if self.fail_clicks {
            return Err(E2eError::Playwright(format!("click:{}: element not found", selector)));
        }
        Ok(())
    }

    async fn count(&mut self, selector: &str) -> E2eResult<usize> {
        self.ensure_open("count")?;
        self.counted.push(selector.to_string());
        Ok(self.counts.get(selector).copied().unwrap_or(0))
    }

    async fn attribute_values(
        &mut self,
        selector: &str,
        _name: &str,
    ) -> E2eResult<Vec<Option<String>>> {
        self.ensure_open("attribute_values")?;
        Ok(self.attributes.get(selector).cloned().unwrap_or_default())
    }

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> E2eResult<()> {
        self.ensure_open("screenshot")?;
        if self.fail_screenshots {
            return Err(E2eError::Playwright("Target page has been closed".to_string()));
        }
        self.screenshots.push((path.to_path_buf(), full_page));
        Ok(())
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.close_calls += 1;
        Ok(())
    }
}

/// Transcript captured by a `Reporter<Vec<u8>>`
pub fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .expect("transcript is UTF-8")
        .lines()
        .map(String::from)
        .collect()
}
