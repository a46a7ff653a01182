//! SQLx implementation of the point transaction repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::gamification::{
    GamificationError, PointTransaction, PointTransactionRepository, UserId,
};

/// SQLx implementation of the point transaction repository
pub struct SqlxPointTransactionRepository {
    pool: Arc<PgPool>,
}

impl SqlxPointTransactionRepository {
    /// Create a new SQLx point transaction repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserTotalRow {
    user_id: Uuid,
    total: i64,
}

#[async_trait]
impl PointTransactionRepository for SqlxPointTransactionRepository {
    async fn insert(&self, transaction: &PointTransaction) -> Result<(), GamificationError> {
        sqlx::query(
            r#"
            INSERT INTO point_transactions
                (id, user_id, amount, transaction_type, description, metadata, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id.as_uuid())
        .bind(transaction.amount)
        .bind(&transaction.transaction_type)
        .bind(&transaction.description)
        .bind(&transaction.metadata)
        .bind(transaction.created_at)
        .bind(transaction.expires_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error inserting point transaction: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(())
    }

    async fn sum_unexpired(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<i64, GamificationError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM point_transactions
            WHERE user_id = $1 AND expires_at > $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(now)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error summing points: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(total)
    }

    async fn totals_by_user(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(UserId, i64)>, GamificationError> {
        let rows = sqlx::query_as::<_, UserTotalRow>(
            r#"
            SELECT user_id, COALESCE(SUM(amount), 0)::BIGINT AS total
            FROM point_transactions
            WHERE expires_at > $1
            GROUP BY user_id
            "#,
        )
        .bind(now)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error aggregating point totals: {}", e);
            GamificationError::database(e.to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|row| (UserId::from(row.user_id), row.total))
            .collect())
    }
}
