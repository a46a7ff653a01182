//! Repository interfaces for the persistent store
//!
//! The relational store is the single source of truth for transactions and
//! badges; each method maps to a durable insert, count, or aggregation query.
//! The cache may be flushed at any time without data loss, only staleness.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{Badge, PointTransaction};
use super::errors::GamificationError;
use super::value_objects::UserId;

/// Append-only access to the point transaction ledger
#[async_trait]
pub trait PointTransactionRepository: Send + Sync {
    /// Durably append a transaction. The insert's own transaction is the
    /// only consistency boundary; no lock spans the cache and the store.
    async fn insert(&self, transaction: &PointTransaction) -> Result<(), GamificationError>;

    /// Sum of amounts over the user's transactions with `expires_at > now`.
    /// Returns 0 when the user has no unexpired transactions.
    async fn sum_unexpired(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<i64, GamificationError>;

    /// Unexpired point totals for every user with at least one unexpired
    /// transaction. Unordered; ranking happens in the domain layer.
    async fn totals_by_user(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(UserId, i64)>, GamificationError>;
}

/// Access to awarded badges
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    async fn insert(&self, badge: &Badge) -> Result<(), GamificationError>;

    /// Whether the user already holds a badge of this type.
    async fn exists(&self, user_id: &UserId, badge_type: &str) -> Result<bool, GamificationError>;

    /// All badges held by the user, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Badge>, GamificationError>;

    /// Badge counts per user, for the badge leaderboard. Unordered.
    async fn counts_by_user(&self) -> Result<Vec<(UserId, i64)>, GamificationError>;

    /// Distinct holder counts per badge type, for the rarity view. Unordered.
    async fn holder_counts_by_type(&self) -> Result<Vec<(String, u64)>, GamificationError>;
}

/// Access to the user table, limited to what rarity computation needs
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Total number of registered users.
    async fn count(&self) -> Result<u64, GamificationError>;
}
