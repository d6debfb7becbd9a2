//! Rate limiting
//!
//! Fixed-window limiter used to throttle login attempts per username.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Rate limit bucket for one key
#[derive(Debug, Clone)]
struct RateLimitBucket {
    requests: u32,
    window_start: Instant,
}

/// Cleanup interval in seconds
const CLEANUP_INTERVAL_SECS: u64 = 60;

/// In-memory rate limiter (per-process, not distributed)
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, RateLimitBucket>>>,
    window: Duration,
    max_requests: u32,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            window: Duration::from_secs(window_secs),
            max_requests,
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Record a request for `key`; false once the window's budget is spent.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.write().await;
        let now = Instant::now();

        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            now.duration_since(*last) >= Duration::from_secs(CLEANUP_INTERVAL_SECS)
        };
        if should_cleanup {
            let before = buckets.len();
            buckets.retain(|_, bucket| now.duration_since(bucket.window_start) < self.window);
            let evicted = before.saturating_sub(buckets.len());
            if evicted > 0 {
                tracing::debug!("Rate limiter: evicted {} expired buckets", evicted);
            }
            *self.last_cleanup.write().await = now;
        }

        match buckets.get_mut(key) {
            Some(bucket) => {
                if now.duration_since(bucket.window_start) >= self.window {
                    bucket.requests = 1;
                    bucket.window_start = now;
                    true
                } else if bucket.requests < self.max_requests {
                    bucket.requests += 1;
                    true
                } else {
                    false
                }
            }
            None => {
                buckets.insert(key.to_string(), RateLimitBucket {
                    requests: 1,
                    window_start: now,
                });
                true
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(60, 10) // 10 login attempts per minute
    }
}
