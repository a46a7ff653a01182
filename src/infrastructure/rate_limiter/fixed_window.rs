//! Fixed-window rate limiter
//!
//! Counts requests per identity+route in non-overlapping, fixed-length time
//! buckets. The bucket index is part of the counter key, so a new window is
//! simply a new key; the old counter expires on its own TTL.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{RateLimitDecision, current_time_millis};
use crate::config::RateLimitConfig;
use crate::infrastructure::cache::CacheStore;

/// Fixed-window admission counter over the cache store
pub struct FixedWindowLimiter {
    store: Arc<dyn CacheStore>,
    config: RateLimitConfig,
    key_prefix: String,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn CacheStore>, config: RateLimitConfig) -> Self {
        Self {
            store,
            config,
            key_prefix: "ratelimit".to_string(),
        }
    }

    /// Whether admission control is enforced at all
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn window_key(&self, identity: &str, route: &str, bucket: u64) -> String {
        format!("{}:{}:{}:{}", self.key_prefix, identity, route, bucket)
    }

    /// Check and count one request for `identity` on `route`.
    ///
    /// The first increment in a window sets the counter's expiry to the
    /// window length; later increments reuse it unchanged. `allowed` is
    /// `count <= limit` and `remaining` is `max(0, limit - count)`.
    ///
    /// Policy: when the backend increment fails transiently this limiter
    /// FAILS OPEN. The request is allowed with a full remaining budget and
    /// the failure is logged. Availability is prioritized over strict
    /// enforcement here, so callers must not rely on this for hard
    /// admission guarantees.
    pub async fn check(
        &self,
        identity: &str,
        route: &str,
        limit: u32,
        window: Duration,
    ) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision::allowed(u32::MAX, u32::MAX, 0);
        }

        let now_ms = current_time_millis();
        let window_ms = window.as_millis().max(1) as u64;
        let bucket = now_ms / window_ms;
        let key = self.window_key(identity, route, bucket);

        let window_count = match self.store.increment(&key, window).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    identity = identity,
                    route = route,
                    "Rate limit backend unavailable, failing open: {}", e
                );
                let reset_at = (now_ms + window_ms).div_ceil(1000);
                return RateLimitDecision::allowed(limit, limit, reset_at);
            }
        };

        let reset_at = window_count.reset_at_ms.div_ceil(1000);
        let count = window_count.count;
        let remaining = (limit as u64).saturating_sub(count) as u32;

        if count <= limit as u64 {
            debug!(
                identity = identity,
                route = route,
                count = count,
                remaining = remaining,
                "Rate limit check passed"
            );
            RateLimitDecision::allowed(limit, remaining, reset_at)
        } else {
            let now_secs = now_ms / 1000;
            let retry_after = reset_at.saturating_sub(now_secs).max(1);
            debug!(
                identity = identity,
                route = route,
                count = count,
                retry_after = retry_after,
                "Rate limit exceeded"
            );
            RateLimitDecision::denied(limit, reset_at, retry_after)
        }
    }

    /// `check` with the configured default limit and window.
    pub async fn check_default(&self, identity: &str, route: &str) -> RateLimitDecision {
        self.check(
            identity,
            route,
            self.config.default_limit,
            Duration::from_millis(self.config.default_window_ms),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCacheStore;

    fn limiter() -> FixedWindowLimiter {
        FixedWindowLimiter::new(
            Arc::new(InMemoryCacheStore::new()),
            RateLimitConfig::default(),
        )
    }

    #[tokio::test]
    async fn counts_down_remaining() {
        let limiter = limiter();
        let window = Duration::from_secs(60);

        let first = limiter.check("u1", "/lessons", 3, window).await;
        assert!(first.allowed);
        assert_eq!(first.remaining, 2);

        let second = limiter.check("u1", "/lessons", 3, window).await;
        assert_eq!(second.remaining, 1);
    }

    #[tokio::test]
    async fn identities_and_routes_are_independent() {
        let limiter = limiter();
        let window = Duration::from_secs(60);

        limiter.check("u1", "/lessons", 1, window).await;
        let other_user = limiter.check("u2", "/lessons", 1, window).await;
        let other_route = limiter.check("u1", "/quizzes", 1, window).await;

        assert!(other_user.allowed);
        assert!(other_route.allowed);
    }

    #[tokio::test]
    async fn disabled_config_always_allows() {
        let store = Arc::new(InMemoryCacheStore::new());
        let limiter = FixedWindowLimiter::new(
            store,
            RateLimitConfig {
                enabled: false,
                ..RateLimitConfig::default()
            },
        );

        for _ in 0..100 {
            let decision = limiter
                .check("u1", "/lessons", 1, Duration::from_secs(60))
                .await;
            assert!(decision.allowed);
        }
    }
}
