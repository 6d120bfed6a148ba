//! Fixed-interval throttle for the remote inference service
//!
//! One limiter is shared by every adapter that talks to the inference
//! service. The check-sleep-update sequence runs under an async mutex, so two
//! concurrent callers can never both observe a stale last-call instant: the
//! second one queues behind the first and then waits out its own interval.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum gap between consecutive calls to the inference service
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(2);

/// Enforces a minimum wall-clock gap between permitted calls
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend the caller until at least `min_interval` has passed since the
    /// previous permitted call, then record now as the last call.
    ///
    /// Never fails. The first call after construction proceeds immediately.
    pub async fn wait_if_needed(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait.as_millis() as u64,
                    "Throttling call to inference service"
                );
                tokio::time::sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
