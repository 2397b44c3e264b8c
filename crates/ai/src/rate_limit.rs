//! Per-user sliding-window rate limiter for provider calls.
//!
//! Each user has a queue of request timestamps. Checking a user drops the
//! timestamps that have fallen out of the window; tracking appends one.
//! Only requests that actually reach the provider are tracked.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use nova_core::types::DbId;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::RateLimitConfig;

pub struct RateLimiter {
    enabled: AtomicBool,
    max_requests: usize,
    window: Duration,
    requests: Mutex<HashMap<DbId, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: AtomicBool::new(config.enabled),
            max_requests: config.max_requests,
            window: config.window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether `user_id` has used up the window.
    ///
    /// Prunes timestamps older than the window as a side effect but never
    /// records a request.
    pub async fn is_limited(&self, user_id: DbId) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.recent_count(user_id).await >= self.max_requests
    }

    /// Record a request for `user_id` at the current instant.
    pub async fn track(&self, user_id: DbId) {
        if !self.is_enabled() {
            return;
        }
        self.requests
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .push_back(Instant::now());
    }

    /// Requests `user_id` may still issue in the current window.
    pub async fn remaining(&self, user_id: DbId) -> usize {
        self.max_requests
            .saturating_sub(self.recent_count(user_id).await)
    }

    /// Prune and count the user's timestamps inside the window.
    async fn recent_count(&self, user_id: DbId) -> usize {
        let mut requests = self.requests.lock().await;
        let Some(timestamps) = requests.get_mut(&user_id) else {
            return 0;
        };

        let now = Instant::now();
        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) < self.window {
                break;
            }
            timestamps.pop_front();
        }

        let count = timestamps.len();
        if count == 0 {
            requests.remove(&user_id);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    fn limiter(max_requests: usize) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enabled: true,
            max_requests,
            window: WINDOW,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn limits_after_max_requests() {
        let l = limiter(3);
        for _ in 0..2 {
            l.track(1).await;
        }
        assert!(!l.is_limited(1).await);

        l.track(1).await;
        assert!(l.is_limited(1).await);
        assert_eq!(l.remaining(1).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn window_expiry_unlimits_without_new_tracking() {
        let l = limiter(2);
        l.track(1).await;
        tokio::time::advance(Duration::from_secs(10)).await;
        l.track(1).await;
        assert!(l.is_limited(1).await);

        // Oldest timestamp leaves the window at t = 60s.
        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(!l.is_limited(1).await);
        assert_eq!(l.remaining(1).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn still_limited_just_inside_the_window() {
        let l = limiter(1);
        l.track(1).await;
        tokio::time::advance(WINDOW - Duration::from_millis(1)).await;
        assert!(l.is_limited(1).await);
    }

    #[tokio::test(start_paused = true)]
    async fn checking_does_not_consume_quota() {
        let l = limiter(1);
        for _ in 0..10 {
            assert!(!l.is_limited(1).await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn users_are_independent() {
        let l = limiter(1);
        l.track(1).await;
        assert!(l.is_limited(1).await);
        assert!(!l.is_limited(2).await);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_limiter_never_limits_or_tracks() {
        let l = limiter(1);
        l.set_enabled(false);
        l.track(1).await;
        l.track(1).await;
        assert!(!l.is_limited(1).await);

        l.set_enabled(true);
        assert!(!l.is_limited(1).await, "nothing was tracked while disabled");
    }
}
