//! Fixed-interval retry bounded by a total timeout
//!
//! Used for every drain condition announcement. The operation is attempted
//! immediately and then once per interval; when the budget runs out the last
//! observed error is returned. A single attempt that hangs is cut off at the
//! deadline as well, so control always comes back.

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, warn};

pub async fn retry_with_timeout<T, F, Fut>(
    mut operation: F,
    interval: Duration,
    timeout: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempt = 0u32;
    let mut last_error: Option<anyhow::Error> = None;

    loop {
        attempt += 1;

        match timeout_at(deadline, operation()).await {
            Ok(Ok(value)) => {
                if attempt > 1 {
                    debug!("Operation succeeded after {} attempts", attempt);
                }
                return Ok(value);
            }
            Ok(Err(e)) => {
                debug!("Attempt {} failed: {}", attempt, e);
                last_error = Some(e);
            }
            Err(_) => {
                // the attempt itself outlived the budget
                break;
            }
        }

        if Instant::now() + interval > deadline {
            break;
        }
        sleep(interval).await;
    }

    warn!(
        "Giving up after {} attempts within {}ms",
        attempt,
        timeout.as_millis()
    );

    Err(match last_error {
        Some(e) => e.context(format!(
            "retry budget of {}ms exhausted after {} attempts",
            timeout.as_millis(),
            attempt
        )),
        None => anyhow!(
            "timed out after {}ms before any attempt completed",
            timeout.as_millis()
        ),
    })
}
