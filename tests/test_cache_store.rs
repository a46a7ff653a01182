//! Cache-aside manager behavior over the in-memory store

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::FailingCacheStore;
use savvy_core::domain::gamification::GamificationError;
use savvy_core::infrastructure::cache::{CacheManager, CacheStore, InMemoryCacheStore};

fn manager() -> (CacheManager, Arc<InMemoryCacheStore>) {
    let store = Arc::new(InMemoryCacheStore::new());
    (CacheManager::new(Arc::clone(&store) as Arc<dyn CacheStore>), store)
}

#[tokio::test]
async fn get_or_fetch_runs_the_fetch_once_per_ttl() {
    let (cache, _store) = manager();
    let fetches = AtomicUsize::new(0);
    let ttl = Duration::from_secs(60);
    let tags = vec!["user:1".to_string()];

    for _ in 0..3 {
        let value: i64 = cache
            .get_or_fetch("points:1", ttl, &tags, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok::<i64, GamificationError>(42)
            })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_errors_propagate_and_cache_nothing() {
    let (cache, _store) = manager();
    let ttl = Duration::from_secs(60);
    let tags: Vec<String> = vec![];

    let result: Result<i64, GamificationError> = cache
        .get_or_fetch("points:1", ttl, &tags, || async {
            Err(GamificationError::database("connection refused"))
        })
        .await;
    assert!(result.is_err());

    // A later successful fetch still runs; the failure left no entry behind.
    let value: i64 = cache
        .get_or_fetch("points:1", ttl, &tags, || async {
            Ok::<i64, GamificationError>(7)
        })
        .await
        .unwrap();
    assert_eq!(value, 7);
}

#[tokio::test]
async fn corrupt_payload_reads_as_a_miss() {
    let (cache, store) = manager();
    store
        .set(
            "points:1",
            "{not json".to_string(),
            Duration::from_secs(60),
            &[],
        )
        .await;

    assert_eq!(cache.get::<i64>("points:1").await, None);
}

#[tokio::test]
async fn tag_invalidation_removes_every_tagged_entry() {
    let (cache, _store) = manager();
    let ttl = Duration::from_secs(60);
    let user_tags = vec!["user:1".to_string()];
    let board_tags = vec!["leaderboard".to_string()];

    cache.set("points:1", &100i64, ttl, &user_tags).await;
    cache.set("rank:points:1", &3u32, ttl, &user_tags).await;
    cache
        .set("leaderboard:points:10", &vec![1i64, 2, 3], ttl, &board_tags)
        .await;

    let removed = cache.invalidate_tags(&["user:1"]).await;
    assert_eq!(removed, 2);

    assert_eq!(cache.get::<i64>("points:1").await, None);
    assert_eq!(cache.get::<u32>("rank:points:1").await, None);
    assert_eq!(
        cache.get::<Vec<i64>>("leaderboard:points:10").await,
        Some(vec![1, 2, 3])
    );
}

#[tokio::test]
async fn unavailable_backend_degrades_to_fetch_every_time() {
    let cache = CacheManager::new(Arc::new(FailingCacheStore));
    let fetches = AtomicUsize::new(0);
    let tags: Vec<String> = vec![];

    for _ in 0..2 {
        let value: i64 = cache
            .get_or_fetch("points:1", Duration::from_secs(60), &tags, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok::<i64, GamificationError>(42)
            })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(cache.invalidate_tags(&["user:1"]).await, 0);
}
