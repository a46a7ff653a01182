//! Fixed-window rate limiter behavior over the cache store

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FailingCacheStore;
use savvy_core::config::RateLimitConfig;
use savvy_core::infrastructure::cache::InMemoryCacheStore;
use savvy_core::infrastructure::rate_limiter::FixedWindowLimiter;

fn limiter_with_store(store: Arc<InMemoryCacheStore>) -> FixedWindowLimiter {
    FixedWindowLimiter::new(store, RateLimitConfig::default())
}

#[tokio::test]
async fn denies_once_the_window_budget_is_spent() {
    let limiter = limiter_with_store(Arc::new(InMemoryCacheStore::new()));
    let window = Duration::from_secs(60);

    for i in 0..3 {
        let decision = limiter.check("u1", "/lessons", 3, window).await;
        assert!(decision.allowed, "request {} should be within budget", i + 1);
    }

    let denied = limiter.check("u1", "/lessons", 3, window).await;
    assert!(!denied.allowed);
    assert_eq!(denied.remaining, 0);
    assert_eq!(denied.limit, 3);
    let retry_after = denied.retry_after.unwrap();
    assert!(retry_after >= 1 && retry_after <= 60);
}

#[tokio::test]
async fn a_new_window_restores_the_budget() {
    let limiter = limiter_with_store(Arc::new(InMemoryCacheStore::new()));
    let window = Duration::from_millis(50);

    limiter.check("u1", "/lessons", 1, window).await;
    let denied = limiter.check("u1", "/lessons", 1, window).await;
    assert!(!denied.allowed);

    // Sleep past the bucket boundary; the counter key changes with it.
    tokio::time::sleep(Duration::from_millis(120)).await;

    let fresh = limiter.check("u1", "/lessons", 1, window).await;
    assert!(fresh.allowed);
    assert_eq!(fresh.remaining, 0);
}

#[tokio::test]
async fn backend_failure_fails_open() {
    let limiter = FixedWindowLimiter::new(Arc::new(FailingCacheStore), RateLimitConfig::default());

    let decision = limiter
        .check("u1", "/lessons", 5, Duration::from_secs(60))
        .await;

    assert!(decision.allowed);
    assert_eq!(decision.remaining, 5);
    assert!(decision.retry_after.is_none());
}

#[tokio::test]
async fn default_check_uses_configured_limit_and_window() {
    let store = Arc::new(InMemoryCacheStore::new());
    let limiter = FixedWindowLimiter::new(
        store,
        RateLimitConfig {
            enabled: true,
            default_limit: 2,
            default_window_ms: 60_000,
        },
    );

    let first = limiter.check_default("u1", "/lessons").await;
    assert_eq!(first.limit, 2);
    assert_eq!(first.remaining, 1);

    limiter.check_default("u1", "/lessons").await;
    let denied = limiter.check_default("u1", "/lessons").await;
    assert!(!denied.allowed);
}
