// Request pacing for the upstream model API.
//
// Moderation and tone rewriting share one Gemini key, so both go through a
// single limiter. Each caller reserves the next free slot under the lock and
// then sleeps outside it, which keeps concurrent submissions queued in order
// without holding the mutex while waiting.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Longest spacing the limiter will enforce: one request per day.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Enforces a minimum spacing between upstream requests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<Slots>>,
}

struct Slots {
    /// Minimum time between requests
    interval: Duration,
    /// Earliest instant the next request may go out
    next_free: Option<Instant>,
}

impl RateLimiter {
    /// Allow at most `requests_per_second` requests per second.
    /// Non-positive or NaN rates disable pacing; rates slower than one
    /// request per `MAX_INTERVAL` are clamped to it.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = if requests_per_second > 0.0 {
            Duration::try_from_secs_f64(1.0 / requests_per_second)
                .map_or(MAX_INTERVAL, |d| d.min(MAX_INTERVAL))
        } else {
            Duration::ZERO
        };
        Self {
            inner: Arc::new(Mutex::new(Slots {
                interval,
                next_free: None,
            })),
        }
    }

    /// Wait for this caller's slot.
    pub async fn acquire(&self) {
        let slot = {
            let mut slots = self.inner.lock().await;
            let now = Instant::now();
            let slot = match slots.next_free {
                Some(next) if next > now => next,
                _ => now,
            };
            slots.next_free = Some(slot + slots.interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}
