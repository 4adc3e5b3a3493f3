//! Category-order verifier
//!
//! Opens the homepage, waits for the category headings and checks that the
//! last one carries the expected marker (the tools section, "Strumenti").
//! Nothing escapes this verifier: errors are reported, a fallback screenshot
//! is attempted and the browser is closed.

use std::io::Write;

use tracing::{debug, warn};

use crate::config::{CategoryCheck, DriverConfig};
use crate::driver::PageDriver;
use crate::error::E2eResult;
use crate::report::{CheckResult, ReportBuilder, Reporter, VerificationReport};
use crate::retry::goto_with_retry;

pub const NAME: &str = "categories";

const CHECK_NAME: &str = "last-category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingVerdict {
    Success,
    /// `last` is `None` when the page rendered no headings at all
    Failure { last: Option<String> },
}

/// Success iff there is at least one heading and the last contains `marker`
pub fn evaluate_headings(headings: &[String], marker: &str) -> HeadingVerdict {
    match headings.last() {
        Some(last) if last.contains(marker) => HeadingVerdict::Success,
        last => HeadingVerdict::Failure {
            last: last.cloned(),
        },
    }
}

/// Run the category-order check and release the browser
pub async fn verify_categories<D, W>(
    driver: &mut D,
    config: &DriverConfig,
    check: &CategoryCheck,
    reporter: &mut Reporter<W>,
) -> VerificationReport
where
    D: PageDriver + ?Sized,
    W: Write,
{
    let mut report = ReportBuilder::new(NAME);

    if let Err(e) = run(driver, config, check, reporter, &mut report).await {
        reporter.line(format!("Error: {}", e));
        report.error(e.to_string());

        let path = config.artifact(&check.error_screenshot);
        match driver.screenshot(&path, false).await {
            Ok(()) => report.screenshot(path),
            Err(shot) => debug!("Error screenshot failed: {}", shot),
        }
    }

    if let Err(e) = driver.close().await {
        warn!("Failed to close browser: {}", e);
    }

    report.finish()
}

async fn run<D, W>(
    driver: &mut D,
    config: &DriverConfig,
    check: &CategoryCheck,
    reporter: &mut Reporter<W>,
    report: &mut ReportBuilder,
) -> E2eResult<()>
where
    D: PageDriver + ?Sized,
    W: Write,
{
    reporter.line("Navigating to homepage...");
    goto_with_retry(driver, &config.url(&check.path), &check.navigation, reporter).await?;

    reporter.line("Waiting for headings...");
    driver
        .wait_for_selector(&check.heading_selector, check.heading_timeout)
        .await?;

    let headings = driver.inner_texts(&check.heading_selector).await?;
    reporter.line(format!("Found headings: {:?}", headings));

    match evaluate_headings(&headings, &check.marker) {
        HeadingVerdict::Success => {
            reporter.line(format!(
                "SUCCESS: '{}' is the last category.",
                check.marker
            ));
            report.check(CheckResult::pass(CHECK_NAME));
        }
        HeadingVerdict::Failure { last } => {
            let last = last.as_deref().unwrap_or("None");
            reporter.line(format!(
                "FAILURE: '{}' is not the last category. Last is '{}'",
                check.marker, last
            ));
            report.check(CheckResult::fail(CHECK_NAME, format!("Last is '{}'", last)));
        }
    }

    let path = config.artifact(&check.screenshot);
    driver.screenshot(&path, true).await?;
    reporter.line(format!("Screenshot saved to {}", path.display()));
    report.screenshot(path);

    Ok(())
}
