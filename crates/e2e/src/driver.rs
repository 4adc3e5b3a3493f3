//! Page driver abstraction
//!
//! The verifiers only need a handful of page primitives. Keeping them behind a
//! trait lets the checks run against Playwright in production and against a
//! scripted page in tests.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::E2eResult;

#[async_trait]
pub trait PageDriver: Send {
    /// Navigate the page. `None` keeps the engine's default timeout.
    async fn goto(&mut self, url: &str, timeout: Option<Duration>) -> E2eResult<()>;

    /// Wait until at least one element matches `selector`
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> E2eResult<()>;

    /// Rendered text of every match, in DOM order
    async fn inner_texts(&mut self, selector: &str) -> E2eResult<Vec<String>>;

    async fn click(&mut self, selector: &str) -> E2eResult<()>;

    async fn count(&mut self, selector: &str) -> E2eResult<usize>;

    /// Value of attribute `name` for every match, `None` where it is absent
    async fn attribute_values(
        &mut self,
        selector: &str,
        name: &str,
    ) -> E2eResult<Vec<Option<String>>>;

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> E2eResult<()>;

    /// Release the browser. Safe to call more than once.
    async fn close(&mut self) -> E2eResult<()>;
}
