//! Points ledger service
//!
//! Awards append to the ledger and are the only write path; balances, ranks,
//! and leaderboards are cached aggregates over unexpired transactions.
//!
//! Ordering on the write path: the durable insert commits before any cache
//! invalidation is attempted. A failed invalidation leaves stale aggregates
//! until their TTL lapses, which is an accepted bounded staleness, not a
//! defect. Concurrent awards for the same user may race at the cache layer;
//! the ledger's insert-only nature is the correctness guard.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::application::errors::ApplicationError;
use crate::config::Config;
use crate::domain::gamification::{
    GamificationError, LeaderboardEntry, PointTransaction, PointTransactionRepository, UserId,
    rank,
};
use crate::infrastructure::cache::CacheManager;
use crate::infrastructure::cache::cache_aside::LEADERBOARD_TAG;

/// Points ledger service
pub struct PointsService {
    transactions: Arc<dyn PointTransactionRepository>,
    cache: Arc<CacheManager>,
    aggregate_ttl: Duration,
    default_expiry_days: i64,
}

impl PointsService {
    pub fn new(
        transactions: Arc<dyn PointTransactionRepository>,
        cache: Arc<CacheManager>,
        config: &Config,
    ) -> Self {
        Self {
            transactions,
            cache,
            aggregate_ttl: Duration::from_secs(config.cache.aggregate_ttl_seconds),
            default_expiry_days: config.gamification.default_point_expiry_days,
        }
    }

    /// Award points to a user.
    ///
    /// Non-positive amounts are a silent no-op returning `Ok(None)`: this
    /// path never subtracts points and never errors on bad input, keeping
    /// call sites simple. Otherwise the transaction is durably appended with
    /// `expires_at = now + expires_in_days` (default 30), and the user's
    /// point/rank entries plus every leaderboard view are invalidated.
    #[instrument(skip(self, metadata), fields(user_id = %user_id, amount = amount))]
    pub async fn award_points(
        &self,
        user_id: UserId,
        amount: i64,
        transaction_type: &str,
        description: &str,
        metadata: serde_json::Value,
        expires_in_days: Option<i64>,
    ) -> Result<Option<PointTransaction>, ApplicationError> {
        if amount <= 0 {
            debug!("Ignoring non-positive point award");
            return Ok(None);
        }

        let transaction = PointTransaction::new(
            user_id,
            amount,
            transaction_type,
            description,
            metadata,
            expires_in_days.unwrap_or(self.default_expiry_days),
        );

        self.transactions.insert(&transaction).await?;

        let user_tag = CacheManager::user_tag(&user_id);
        let invalidated = self
            .cache
            .invalidate_tags(&[user_tag.as_str(), LEADERBOARD_TAG])
            .await;
        debug!(
            invalidated = invalidated,
            "Awarded {} points to {}", amount, user_id
        );

        Ok(Some(transaction))
    }

    /// Cached sum of the user's unexpired point amounts; 0 when none exist.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_points(&self, user_id: UserId) -> Result<i64, ApplicationError> {
        let key = CacheManager::points_key(&user_id);
        let tags = vec![CacheManager::user_tag(&user_id)];

        let total = self
            .cache
            .get_or_fetch(&key, self.aggregate_ttl, &tags, || async {
                self.transactions.sum_unexpired(&user_id, Utc::now()).await
            })
            .await?;

        Ok(total)
    }

    /// Cached rank of the user among all users by unexpired point total,
    /// descending. `None` for users with no unexpired transactions.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_rank(&self, user_id: UserId) -> Result<Option<u32>, ApplicationError> {
        let key = CacheManager::rank_key(&user_id);
        let tags = vec![
            CacheManager::user_tag(&user_id),
            LEADERBOARD_TAG.to_string(),
        ];

        let user_rank = self
            .cache
            .get_or_fetch(&key, self.aggregate_ttl, &tags, || async {
                let totals = self.transactions.totals_by_user(Utc::now()).await?;
                Ok::<_, GamificationError>(rank(totals)
                    .into_iter()
                    .find(|entry| entry.user_id == user_id)
                    .map(|entry| entry.rank))
            })
            .await?;

        Ok(user_rank)
    }

    /// Cached top-`limit` ranked view over unexpired point totals.
    #[instrument(skip(self))]
    pub async fn get_leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, ApplicationError> {
        let key = CacheManager::leaderboard_key(limit);
        let tags = vec![LEADERBOARD_TAG.to_string()];

        let entries = self
            .cache
            .get_or_fetch(&key, self.aggregate_ttl, &tags, || async {
                let totals = self.transactions.totals_by_user(Utc::now()).await?;
                let mut ranked = rank(totals);
                ranked.truncate(limit);
                Ok::<_, GamificationError>(ranked)
            })
            .await?;

        Ok(entries)
    }
}
