//! Cache-aside base
//!
//! Typed "return cached value or compute-and-cache" over a `CacheStore`,
//! plus the namespaced key and tag builders every higher service uses.
//!
//! No request coalescing is attempted: concurrent misses for the same key
//! may each run the fetch independently, which is acceptable because every
//! fetch is a pure, idempotent read against the persistent store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::store::CacheStore;
use crate::domain::gamification::UserId;

/// Tag carried by every cached ranked view over points or badges.
pub const LEADERBOARD_TAG: &str = "leaderboard";

/// Tag carried by the global badge-rarity view.
pub const RARE_BADGES_TAG: &str = "rare-badges";

/// Cache-aside manager shared by all services
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Read a typed value. A corrupt payload counts as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding corrupt cache payload for key {}: {}", key, e);
                None
            }
        }
    }

    /// Store a typed value, best-effort.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration, tags: &[String]) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, raw, ttl, tags).await,
            Err(e) => warn!("Failed to serialize cache value for key {}: {}", key, e),
        }
    }

    /// Return the cached value, or run `fetch`, cache its result, and return
    /// it. Fetch errors propagate untouched; cache failures never do.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        tags: &[String],
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        self.set(key, &value, ttl, tags).await;
        Ok(value)
    }

    /// Delete every entry carrying any of the tags. Returns entries removed.
    pub async fn invalidate_tags(&self, tags: &[&str]) -> u64 {
        let mut removed = 0;
        for tag in tags {
            removed += self.store.invalidate_tag(tag).await;
        }
        removed
    }

    // Key builders. Keys are namespaced per aggregate; tags mark the logical
    // entities a key depends on so writers can invalidate without scans.

    pub fn points_key(user_id: &UserId) -> String {
        format!("points:{}", user_id)
    }

    pub fn rank_key(user_id: &UserId) -> String {
        format!("rank:points:{}", user_id)
    }

    pub fn leaderboard_key(limit: usize) -> String {
        format!("leaderboard:points:{}", limit)
    }

    pub fn badge_leaderboard_key(limit: usize) -> String {
        format!("leaderboard:badges:{}", limit)
    }

    pub fn user_badges_key(user_id: &UserId) -> String {
        format!("badges:{}", user_id)
    }

    pub fn has_badge_key(user_id: &UserId, badge_type: &str) -> String {
        format!("badges:{}:has:{}", user_id, badge_type)
    }

    pub fn rare_badges_key(limit: usize) -> String {
        format!("badges:rare:{}", limit)
    }

    pub fn user_tag(user_id: &UserId) -> String {
        format!("user:{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn keys_are_namespaced_per_aggregate() {
        let user = UserId::new(Uuid::from_u128(7));
        assert_eq!(CacheManager::points_key(&user), format!("points:{}", user));
        assert_eq!(
            CacheManager::has_badge_key(&user, "FIRST_LESSON"),
            format!("badges:{}:has:FIRST_LESSON", user)
        );
        assert_eq!(CacheManager::leaderboard_key(10), "leaderboard:points:10");
        assert_eq!(CacheManager::rare_badges_key(5), "badges:rare:5");
        assert_eq!(CacheManager::user_tag(&user), format!("user:{}", user));
    }
}
