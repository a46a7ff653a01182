//! Gamification entities
//!
//! `PointTransaction` and `Badge` are owned by the persistent store and are
//! immutable once written. The leaderboard and rarity types are derived views
//! recomputed from aggregation queries, never persisted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::UserId;

/// An append-only ledger entry awarding points to a user.
///
/// "Expiry" is a filter predicate (`expires_at > now`) applied at read time;
/// expired transactions are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: Uuid,
    pub user_id: UserId,
    pub amount: i64,
    pub transaction_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PointTransaction {
    /// Create a new transaction expiring `expires_in_days` from now.
    pub fn new(
        user_id: UserId,
        amount: i64,
        transaction_type: impl Into<String>,
        description: impl Into<String>,
        metadata: serde_json::Value,
        expires_in_days: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            transaction_type: transaction_type.into(),
            description: description.into(),
            metadata,
            created_at: now,
            expires_at: now + Duration::days(expires_in_days),
        }
    }

    /// Whether this transaction still counts toward the user's balance.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// An achievement record held by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    pub user_id: UserId,
    pub badge_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub awarded_at: DateTime<Utc>,
}

impl Badge {
    pub fn new(
        user_id: UserId,
        badge_type: impl Into<String>,
        description: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            badge_type: badge_type.into(),
            description: description.into(),
            metadata,
            awarded_at: Utc::now(),
        }
    }
}

/// One row of a ranked leaderboard view. Derived only, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub total: i64,
    pub rank: u32,
}

/// Global rarity of one badge type: how many users hold it, and that count
/// divided by the total user count (2-decimal rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeRarity {
    pub badge_type: String,
    pub holders: u64,
    pub rarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_expiry_is_a_predicate() {
        let tx = PointTransaction::new(
            UserId::generate(),
            50,
            "LESSON_COMPLETE",
            "Completed budgeting basics",
            serde_json::json!({}),
            30,
        );
        let now = Utc::now();
        assert!(tx.is_active(now));
        assert!(!tx.is_active(now + Duration::days(31)));
    }

    #[test]
    fn zero_day_expiry_is_immediately_inactive() {
        let tx = PointTransaction::new(
            UserId::generate(),
            10,
            "QUIZ_PASSED",
            "",
            serde_json::json!({}),
            0,
        );
        assert!(!tx.is_active(Utc::now()));
    }
}
