//! Badge registry service
//!
//! Awards are unique per (user, type) unless the caller explicitly permits
//! duplicates; re-awarding without permission is an idempotent no-op, not an
//! error. The same durable-write-then-invalidate ordering as the points
//! ledger applies.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::application::errors::ApplicationError;
use crate::config::Config;
use crate::domain::gamification::{
    Badge, BadgeRarity, BadgeRepository, GamificationError, LeaderboardEntry, UserId,
    UserRepository, rank,
};
use crate::infrastructure::cache::CacheManager;
use crate::infrastructure::cache::cache_aside::{LEADERBOARD_TAG, RARE_BADGES_TAG};

/// Badge registry service
pub struct BadgeService {
    badges: Arc<dyn BadgeRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<CacheManager>,
    aggregate_ttl: Duration,
    rarity_ttl: Duration,
}

impl BadgeService {
    pub fn new(
        badges: Arc<dyn BadgeRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<CacheManager>,
        config: &Config,
    ) -> Self {
        Self {
            badges,
            users,
            cache,
            aggregate_ttl: Duration::from_secs(config.cache.aggregate_ttl_seconds),
            rarity_ttl: Duration::from_secs(config.cache.rarity_ttl_seconds),
        }
    }

    /// Award a badge to a user.
    ///
    /// When `allow_duplicates` is false and the user already holds the type,
    /// returns `Ok(None)` without writing. Racing first-time awards may both
    /// pass the existence check; the store's uniqueness constraint is the
    /// correctness guard there.
    #[instrument(skip(self, metadata), fields(user_id = %user_id, badge_type = badge_type))]
    pub async fn award_badge(
        &self,
        user_id: UserId,
        badge_type: &str,
        description: &str,
        metadata: serde_json::Value,
        allow_duplicates: bool,
    ) -> Result<Option<Badge>, ApplicationError> {
        if !allow_duplicates && self.badges.exists(&user_id, badge_type).await? {
            debug!("User already holds badge, skipping duplicate award");
            return Ok(None);
        }

        let badge = Badge::new(user_id, badge_type, description, metadata);
        self.badges.insert(&badge).await?;

        let user_tag = CacheManager::user_tag(&user_id);
        let invalidated = self
            .cache
            .invalidate_tags(&[user_tag.as_str(), LEADERBOARD_TAG, RARE_BADGES_TAG])
            .await;
        debug!(
            invalidated = invalidated,
            "Awarded badge {} to {}", badge_type, user_id
        );

        Ok(Some(badge))
    }

    /// Cached check for whether the user holds a badge of this type.
    #[instrument(skip(self), fields(user_id = %user_id, badge_type = badge_type))]
    pub async fn has_badge(
        &self,
        user_id: UserId,
        badge_type: &str,
    ) -> Result<bool, ApplicationError> {
        let key = CacheManager::has_badge_key(&user_id, badge_type);
        let tags = vec![CacheManager::user_tag(&user_id)];

        let exists = self
            .cache
            .get_or_fetch(&key, self.aggregate_ttl, &tags, || async {
                self.badges.exists(&user_id, badge_type).await
            })
            .await?;

        Ok(exists)
    }

    /// Cached list of the user's badges, newest first.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_badges(&self, user_id: UserId) -> Result<Vec<Badge>, ApplicationError> {
        let key = CacheManager::user_badges_key(&user_id);
        let tags = vec![CacheManager::user_tag(&user_id)];

        let badges = self
            .cache
            .get_or_fetch(&key, self.aggregate_ttl, &tags, || async {
                self.badges.find_by_user(&user_id).await
            })
            .await?;

        Ok(badges)
    }

    /// Cached top-`limit` ranked view over badge counts.
    #[instrument(skip(self))]
    pub async fn get_badge_leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, ApplicationError> {
        let key = CacheManager::badge_leaderboard_key(limit);
        let tags = vec![LEADERBOARD_TAG.to_string()];

        let entries = self
            .cache
            .get_or_fetch(&key, self.aggregate_ttl, &tags, || async {
                let counts = self.badges.counts_by_user().await?;
                let mut ranked = rank(counts);
                ranked.truncate(limit);
                Ok::<_, GamificationError>(ranked)
            })
            .await?;

        Ok(entries)
    }

    /// The `limit` badge types with the fewest distinct holders, ascending,
    /// each annotated with holders / total users rounded to 2 decimals.
    ///
    /// Cached for an hour rather than the aggregate TTL: global rarity
    /// shifts slowly.
    #[instrument(skip(self))]
    pub async fn get_rare_badges(
        &self,
        limit: usize,
    ) -> Result<Vec<BadgeRarity>, ApplicationError> {
        let key = CacheManager::rare_badges_key(limit);
        let tags = vec![RARE_BADGES_TAG.to_string()];

        let rarities = self
            .cache
            .get_or_fetch(&key, self.rarity_ttl, &tags, || async {
                let total_users = self.users.count().await?;
                let mut counts = self.badges.holder_counts_by_type().await?;
                counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
                counts.truncate(limit);

                Ok::<_, GamificationError>(counts
                    .into_iter()
                    .map(|(badge_type, holders)| BadgeRarity {
                        badge_type,
                        holders,
                        rarity: rarity_ratio(holders, total_users),
                    })
                    .collect::<Vec<_>>())
            })
            .await?;

        Ok(rarities)
    }
}

/// Holder share of the user base, rounded to 2 decimals. 0 when there are
/// no users yet.
fn rarity_ratio(holders: u64, total_users: u64) -> f64 {
    if total_users == 0 {
        return 0.0;
    }
    let ratio = holders as f64 / total_users as f64;
    (ratio * 100.0).round() / 100.0
}
