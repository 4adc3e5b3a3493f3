//! Optional pre-flight check for the application under test
//!
//! The verifiers never start the app themselves. When asked to, they can wait
//! until something answers HTTP on the base URL before the browser is launched.

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `base_url` until any HTTP response arrives, whatever its status
pub async fn wait_until_reachable(base_url: &str, timeout: Duration) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout {
        attempts += 1;

        match client.get(base_url).send().await {
            Ok(resp) => {
                info!("Server at {} answered with {}", base_url, resp.status());
                return Ok(());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for server at {}...", base_url);
                }
                // Connection refused is expected while the server is starting
                if !e.is_connect() {
                    warn!("Probe error: {}", e);
                }
            }
        }

        sleep(POLL_INTERVAL).await;
    }

    Err(E2eError::ServerUnreachable {
        url: base_url.to_string(),
        attempts,
    })
}
