//! Sliding-window rate limiting for geocoding providers
//!
//! Free providers (Nominatim asks for at most one request per second) ban
//! clients that go faster, so every outgoing request waits its turn here.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Rate limiter for API requests
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per window
    max_requests: u32,
    /// Length of the sliding window
    window: Duration,
    /// Request timestamps within the current window
    request_times: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            request_times: VecDeque::new(),
        }
    }

    /// Rate limiter allowing `per_second` requests every second
    #[must_use]
    pub fn per_second(per_second: u32) -> Self {
        Self::new(per_second, Duration::from_secs(1))
    }

    /// Check if a request is allowed and record it
    pub fn allow_request(&mut self) -> bool {
        self.cleanup_old_requests();

        if self.request_times.len() >= self.max_requests as usize {
            false
        } else {
            self.request_times.push_back(Instant::now());
            true
        }
    }

    /// Get time until next request is allowed
    pub fn time_until_next_request(&mut self) -> Duration {
        self.cleanup_old_requests();

        if self.request_times.len() < self.max_requests as usize {
            return Duration::ZERO;
        }

        self.request_times
            .front()
            .map_or(Duration::ZERO, |oldest| {
                self.window.saturating_sub(oldest.elapsed())
            })
    }

    /// Remove requests that fell out of the window
    fn cleanup_old_requests(&mut self) {
        let window = self.window;
        while self
            .request_times
            .front()
            .is_some_and(|time| time.elapsed() >= window)
        {
            self.request_times.pop_front();
        }
    }
}

/// A `RateLimiter` shared by concurrent lookups
#[derive(Debug)]
pub struct SharedRateLimiter {
    inner: Mutex<RateLimiter>,
}

impl SharedRateLimiter {
    #[must_use]
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            inner: Mutex::new(limiter),
        }
    }

    /// Wait until a request slot is free and claim it
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut limiter = self.inner.lock().await;
                if limiter.allow_request() {
                    return;
                }
                limiter.time_until_next_request()
            };

            debug!("Rate limit reached, waiting {:.3}s", wait.as_secs_f64());
            tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));

        // Should allow first 2 requests
        assert!(limiter.allow_request());
        assert!(limiter.allow_request());

        // Should deny 3rd request
        assert!(!limiter.allow_request());

        // Check time until next request
        let wait_time = limiter.time_until_next_request();
        assert!(wait_time > Duration::from_secs(0));
    }

    #[test]
    fn test_zero_max_requests_still_allows_one() {
        let mut limiter = RateLimiter::new(0, Duration::from_secs(60));
        assert!(limiter.allow_request());
        assert!(!limiter.allow_request());
    }

    #[tokio::test]
    async fn test_shared_limiter_spaces_requests() {
        let limiter = SharedRateLimiter::new(RateLimiter::new(1, Duration::from_millis(50)));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(45));
    }
}
