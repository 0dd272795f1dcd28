//! Backoff for upstream page fetches.
//!
//! Rate limiting, 5xx responses and dropped connections usually clear up
//! after a pause; every other failure is returned on the spot.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Pause before the first retry; doubles for each one after
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryConfig {
    /// Page fetch backoff: 2s, 4s, 8s, ... capped at 30s
    pub fn network(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }

    /// Pause before retry number `retry`, counting from zero
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails with an error `is_transient`
/// rejects, or runs out of retries.
pub async fn retry_when<T, E, F, Fut, P>(
    config: &RetryConfig,
    what: &str,
    mut operation: F,
    is_transient: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut retries = 0;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!("{} succeeded after {} retries", what, retries);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if retries >= config.max_retries || !is_transient(&err) {
            return Err(err);
        }

        let delay = config.backoff(retries);
        retries += 1;
        warn!(
            "{} failed: {}. Retry {}/{} in {:?}",
            what, err, retries, config.max_retries, delay
        );
        sleep(delay).await;
    }
}
