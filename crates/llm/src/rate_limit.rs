//! Pacing for successive generation calls.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Grants permission to make the next generation call.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next call may proceed.
    async fn acquire(&self);
}

/// Spaces permits at least `delay` apart. The first permit is immediate.
pub struct FixedDelay {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: Mutex::new(None),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready = prev + self.delay;
            if ready > Instant::now() {
                debug!(wait_ms = (ready - Instant::now()).as_millis() as u64, "pacing generation call");
                tokio::time::sleep_until(ready).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}
