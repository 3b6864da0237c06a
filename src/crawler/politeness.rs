//! Request pacing
//!
//! Every outbound request goes through a `Governor`, which guarantees at
//! least `delay` between the end of one request attempt and the start of the
//! next, whether the attempt succeeded or not.

use std::future::Future;
use std::time::{Duration, Instant};

/// Enforces a minimum pause between consecutive requests
#[derive(Debug, Clone)]
pub struct Governor {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Governor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Time left before the next request may start, or `None` if it may start now
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let ready_at = last + self.delay;
        (ready_at > now).then(|| ready_at - now)
    }

    /// Records that a request attempt just finished
    pub fn record_request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Runs `request` once the delay since the previous attempt has elapsed
    ///
    /// The completion time is recorded regardless of the request's outcome.
    pub async fn throttle<F: Future>(&mut self, request: F) -> F::Output {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Politeness delay: sleeping {:?}", wait);
            tokio::time::sleep(wait).await;
        }

        let output = request.await;
        self.record_request(Instant::now());
        output
    }
}
