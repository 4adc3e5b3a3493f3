//! Fixed-interval navigation retry

use std::io::Write;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::driver::PageDriver;
use crate::error::{E2eError, E2eResult};
use crate::report::Reporter;

/// Bounded retry with a fixed pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, first one included
    pub attempts: u32,
    /// Navigation timeout applied to each attempt
    pub attempt_timeout: Duration,
    /// Pause after a failed attempt
    pub interval: Duration,
}

/// Navigate to `url`, retrying while the server comes up.
///
/// Each failure is reported as `Attempt N failed: ...`. When every attempt
/// fails the last error is returned.
pub async fn goto_with_retry<D, W>(
    driver: &mut D,
    url: &str,
    policy: &RetryPolicy,
    reporter: &mut Reporter<W>,
) -> E2eResult<()>
where
    D: PageDriver + ?Sized,
    W: Write,
{
    let mut last_error = None;

    for attempt in 1..=policy.attempts {
        match driver.goto(url, Some(policy.attempt_timeout)).await {
            Ok(()) => {
                debug!("Reached {} on attempt {}", url, attempt);
                return Ok(());
            }
            Err(e) => {
                reporter.line(format!("Attempt {} failed: {}", attempt, e));
                last_error = Some(e);
                if attempt < policy.attempts {
                    sleep(policy.interval).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| E2eError::Navigation {
        url: url.to_string(),
        reason: "no navigation attempts configured".to_string(),
    }))
}
