//! SQLx implementation of the user repository

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::gamification::{GamificationError, UserRepository};

/// SQLx implementation of the user repository
pub struct SqlxUserRepository {
    pool: Arc<PgPool>,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn count(&self) -> Result<u64, GamificationError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database error counting users: {}", e);
                GamificationError::database(e.to_string())
            })?;

        Ok(count.max(0) as u64)
    }
}
