//! Fixed-interval request pacing.
//!
//! Guarantees at least `interval` of wall-clock time between the start of
//! consecutive upstream requests. The first request goes out immediately.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Paces upstream requests
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
    interval: Duration,
}

struct RateLimiterState {
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter that spaces requests by `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimiterState { last_request: None })),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request is allowed, then claim the slot
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        if let Some(last) = state.last_request {
            let ready_at = last + self.interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }

        state.last_request = Some(Instant::now());
    }
}
