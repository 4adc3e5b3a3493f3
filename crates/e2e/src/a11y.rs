//! Accessibility-label verifier
//!
//! On an experiment page, appends a measurement row and checks that the
//! generated value and uncertainty inputs carry their screen-reader labels,
//! e.g. `Valore per Lunghezza (l) (riga 1)`.
//!
//! Label verdicts only go to the report. Any error is returned to the caller
//! after the fallback screenshot and the browser close have been attempted.

use std::fmt;
use std::io::Write;

use tracing::{debug, warn};

use crate::config::{A11yCheck, DriverConfig};
use crate::driver::PageDriver;
use crate::error::{E2eError, E2eResult};
use crate::report::{CheckResult, ReportBuilder, Reporter, VerificationReport};
use crate::selectors::{attr_equals, button_with_text};

pub const NAME: &str = "a11y";

const ARIA_LABEL: &str = "aria-label";

/// The two inputs rendered per quantity and row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Value,
    Uncertainty,
}

impl FieldKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            FieldKind::Value => "Valore",
            FieldKind::Uncertainty => "Incertezza",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Label of a measurement-table input: `"<Valore|Incertezza> per <quantity> (riga <row>)"`
pub fn aria_label(kind: FieldKind, quantity: &str, row: u32) -> String {
    format!("{} per {} (riga {})", kind, quantity, row)
}

/// Run the label checks, then release the browser
pub async fn verify_a11y<D, W>(
    driver: &mut D,
    config: &DriverConfig,
    check: &A11yCheck,
    reporter: &mut Reporter<W>,
) -> E2eResult<VerificationReport>
where
    D: PageDriver + ?Sized,
    W: Write,
{
    let mut report = ReportBuilder::new(NAME);
    let outcome = run(driver, config, check, reporter, &mut report).await;

    if let Err(e) = &outcome {
        reporter.line(format!("Error: {}", e));
        let path = config.artifact(&check.error_screenshot);
        if let Err(shot) = driver.screenshot(&path, false).await {
            warn!("Error screenshot failed: {}", shot);
        }
    }

    if let Err(e) = driver.close().await {
        warn!("Failed to close browser: {}", e);
    }

    outcome.map(|()| report.finish())
}

async fn run<D, W>(
    driver: &mut D,
    config: &DriverConfig,
    check: &A11yCheck,
    reporter: &mut Reporter<W>,
    report: &mut ReportBuilder,
) -> E2eResult<()>
where
    D: PageDriver + ?Sized,
    W: Write,
{
    let url = config.url(&check.path);
    reporter.line(format!("Navigating to {}...", url));
    driver.goto(&url, None).await?;

    reporter.line("Waiting for table...");
    driver
        .wait_for_selector(&check.table_selector, check.table_timeout)
        .await?;

    reporter.line("Adding a row...");
    driver.click(&button_with_text(&check.add_row_label)).await?;

    reporter.line("Waiting for inputs...");
    driver
        .wait_for_selector(&check.input_selector, check.input_timeout)
        .await?;

    reporter.line("Checking aria-labels...");
    for kind in [FieldKind::Value, FieldKind::Uncertainty] {
        let label = aria_label(kind, &check.quantity, check.row);
        let found = label_present(driver, &label).await?;

        if found {
            reporter.line(format!("SUCCESS: Found input with aria-label '{}'", label));
            report.check(CheckResult::pass(label));
        } else {
            reporter.line(format!(
                "FAILURE: Did not find input with aria-label '{}'",
                label
            ));
            if kind == FieldKind::Value {
                dump_input_labels(driver, reporter).await?;
            }
            report.check(CheckResult::fail(label, "no input with this label"));
        }
    }

    let path = config.artifact(&check.screenshot);
    driver.screenshot(&path, false).await?;
    reporter.line(format!("Screenshot saved to {}", path.display()));
    report.screenshot(path);

    Ok(())
}

async fn label_present<D>(driver: &mut D, label: &str) -> E2eResult<bool>
where
    D: PageDriver + ?Sized,
{
    let count = driver.count(&attr_equals("input", ARIA_LABEL, label)).await?;
    debug!("{} input(s) labelled '{}'", count, label);
    Ok(count > 0)
}

/// Print the label of every input on the page
async fn dump_input_labels<D, W>(driver: &mut D, reporter: &mut Reporter<W>) -> E2eResult<()>
where
    D: PageDriver + ?Sized,
    W: Write,
{
    let labels = driver.attribute_values("input", ARIA_LABEL).await?;
    for (i, label) in labels.iter().enumerate() {
        reporter.line(format!(
            "Input {} aria-label: {}",
            i,
            label.as_deref().unwrap_or("None")
        ));
    }
    Ok(())
}

/// Exit status for a finished run: label verdicts never fail the process
pub fn exit_code(outcome: &Result<VerificationReport, E2eError>) -> i32 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
