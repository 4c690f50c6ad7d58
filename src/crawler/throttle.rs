//! Request throttle for single-flight rate limiting
//!
//! The throttle enforces a minimum delay between consecutive network
//! requests, measured from the end of the previous request. Cache hits never
//! touch the throttle, so they neither wait nor reset the clock.

use std::time::{Duration, Instant};

/// Tracks when the last network request finished
#[derive(Debug, Clone)]
pub struct Throttle {
    /// Minimum gap between the end of one request and the start of the next
    min_delay: Duration,

    /// When the most recent network request finished
    last_request_end: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle that has not seen any request yet
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request_end: None,
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Calculates the time until the next request may start
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_end?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_delay {
            Some(self.min_delay - elapsed)
        } else {
            None
        }
    }

    /// Blocks the caller until the next request may start
    ///
    /// Returns how long it actually waited.
    pub async fn wait(&self) -> Duration {
        match self.time_until_ready(Instant::now()) {
            Some(delay) => {
                tracing::trace!("Rate limit: waiting {:?} before next request", delay);
                tokio::time::sleep(delay).await;
                delay
            }
            None => Duration::ZERO,
        }
    }

    /// Records that a network request finished at `at`
    pub fn record_request_end(&mut self, at: Instant) {
        self.last_request_end = Some(at);
    }
}
