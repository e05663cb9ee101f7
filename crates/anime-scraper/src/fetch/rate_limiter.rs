//! Outgoing request throttle.
//!
//! Enforces both a per-second spacing and a per-minute window so a burst of
//! API calls does not hammer the scrape target.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::time::sleep;

const WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between two requests
    min_interval: Duration,
    /// Maximum requests per minute
    max_per_minute: usize,
    /// Request timestamps in the last minute, oldest first
    recent_requests: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_per_second: f64, max_per_minute: u32) -> Self {
        let min_interval = if max_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / max_per_second)
        } else {
            Duration::ZERO
        };

        Self {
            min_interval,
            max_per_minute: max_per_minute.max(1) as usize,
            recent_requests: VecDeque::with_capacity(max_per_minute as usize),
        }
    }

    /// How long a request issued at `now` has to wait
    fn delay_at(&mut self, now: Instant) -> Duration {
        while let Some(&oldest) = self.recent_requests.front() {
            if now.duration_since(oldest) >= WINDOW {
                self.recent_requests.pop_front();
            } else {
                break;
            }
        }

        let mut wait = Duration::ZERO;

        if self.recent_requests.len() >= self.max_per_minute {
            if let Some(&oldest) = self.recent_requests.front() {
                wait = wait.max(WINDOW - now.duration_since(oldest));
            }
        }

        if let Some(&last) = self.recent_requests.back() {
            let elapsed = now.duration_since(last);
            if elapsed < self.min_interval {
                wait = wait.max(self.min_interval - elapsed);
            }
        }

        wait
    }

    /// Wait until a request can be made, then record it
    pub async fn acquire(&mut self) {
        let wait = self.delay_at(Instant::now());
        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit: waiting");
            sleep(wait).await;
        }
        self.recent_requests.push_back(Instant::now());
    }

    /// Number of requests recorded in the last minute
    pub fn current_minute_count(&mut self) -> usize {
        let now = Instant::now();
        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < WINDOW);
        self.recent_requests.len()
    }
}
