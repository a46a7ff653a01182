//! SQLx implementation of the badge repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::gamification::{Badge, BadgeRepository, GamificationError, UserId};

/// SQLx implementation of the badge repository
pub struct SqlxBadgeRepository {
    pool: Arc<PgPool>,
}

impl SqlxBadgeRepository {
    /// Create a new SQLx badge repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BadgeRow {
    id: Uuid,
    user_id: Uuid,
    badge_type: String,
    description: String,
    metadata: serde_json::Value,
    awarded_at: DateTime<Utc>,
}

impl From<BadgeRow> for Badge {
    fn from(row: BadgeRow) -> Self {
        Badge {
            id: row.id,
            user_id: UserId::from(row.user_id),
            badge_type: row.badge_type,
            description: row.description,
            metadata: row.metadata,
            awarded_at: row.awarded_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserCountRow {
    user_id: Uuid,
    total: i64,
}

#[derive(sqlx::FromRow)]
struct HolderCountRow {
    badge_type: String,
    holders: i64,
}

#[async_trait]
impl BadgeRepository for SqlxBadgeRepository {
    async fn insert(&self, badge: &Badge) -> Result<(), GamificationError> {
        sqlx::query(
            r#"
            INSERT INTO badges (id, user_id, badge_type, description, metadata, awarded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(badge.id)
        .bind(badge.user_id.as_uuid())
        .bind(&badge.badge_type)
        .bind(&badge.description)
        .bind(&badge.metadata)
        .bind(badge.awarded_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error inserting badge: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(())
    }

    async fn exists(&self, user_id: &UserId, badge_type: &str) -> Result<bool, GamificationError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM badges WHERE user_id = $1 AND badge_type = $2)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(badge_type)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error checking badge existence: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(exists)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Badge>, GamificationError> {
        let rows = sqlx::query_as::<_, BadgeRow>(
            r#"
            SELECT id, user_id, badge_type, description, metadata, awarded_at
            FROM badges
            WHERE user_id = $1
            ORDER BY awarded_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error finding badges: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(rows.into_iter().map(Badge::from).collect())
    }

    async fn counts_by_user(&self) -> Result<Vec<(UserId, i64)>, GamificationError> {
        let rows = sqlx::query_as::<_, UserCountRow>(
            r#"
            SELECT user_id, COUNT(*) AS total
            FROM badges
            GROUP BY user_id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error counting badges per user: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|row| (UserId::from(row.user_id), row.total))
            .collect())
    }

    async fn holder_counts_by_type(&self) -> Result<Vec<(String, u64)>, GamificationError> {
        let rows = sqlx::query_as::<_, HolderCountRow>(
            r#"
            SELECT badge_type, COUNT(DISTINCT user_id) AS holders
            FROM badges
            GROUP BY badge_type
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error counting badge holders: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|row| (row.badge_type, row.holders.max(0) as u64))
            .collect())
    }
}
