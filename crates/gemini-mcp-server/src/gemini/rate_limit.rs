// crates/gemini-mcp-server/src/gemini/rate_limit.rs
// Minimum spacing between non-forced consultations

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Paces callers so two acquisitions are at least `delay` apart.
///
/// The lock is held across the wait, so concurrent callers queue up and
/// each gets its own slot.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// NaN and non-positive delays disable pacing; delays too large for a
    /// `Duration` saturate to `Duration::MAX`.
    pub fn new(delay_secs: f64) -> Self {
        let delay = if delay_secs.is_nan() || delay_secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(delay_secs).unwrap_or(Duration::MAX)
        };
        Self {
            delay,
            last: Mutex::new(None),
        }
    }

    /// Wait out the remainder of the window, then stamp the current time.
    ///
    /// Returns how long the caller was suspended.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last.lock().await;

        let waited = match *last {
            Some(prev) => {
                let elapsed = prev.elapsed();
                if elapsed < self.delay {
                    let wait = self.delay - elapsed;
                    debug!(wait_ms = wait.as_millis() as u64, "Rate limit: waiting before consultation");
                    tokio::time::sleep(wait).await;
                    wait
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };

        *last = Some(Instant::now());
        waited
    }

    /// When the rate-limit timestamp was last updated, if ever
    pub async fn last_acquired(&self) -> Option<Instant> {
        *self.last.lock().await
    }
}
