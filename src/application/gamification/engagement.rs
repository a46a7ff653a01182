//! Engagement service facade
//!
//! Constructed once at process start and passed by handle to every caller.
//! There is deliberately no global instance and no lazy static: one-per-
//! process is a property of the wiring, not of hidden mutable state.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use super::{BadgeService, PointsService};
use crate::application::errors::ApplicationError;
use crate::config::Config;
use crate::infrastructure::cache::{
    CacheManager, CacheStore, InMemoryCacheStore, RedisCacheStore,
};
use crate::infrastructure::rate_limiter::FixedWindowLimiter;
use crate::infrastructure::repositories::{
    SqlxBadgeRepository, SqlxPointTransactionRepository, SqlxUserRepository,
};

/// Handle bundling the gamification services and the rate limiter for the
/// calling (HTTP/route) layer.
pub struct EngagementService {
    points: Arc<PointsService>,
    badges: Arc<BadgeService>,
    rate_limiter: Arc<FixedWindowLimiter>,
}

impl EngagementService {
    /// Wire the full engagement core against a database pool and the
    /// configured cache backend.
    ///
    /// When the cache backend is disabled or unreachable, falls back to an
    /// in-process store: the cache is advisory, so degraded caching only
    /// costs recomputation and per-instance rate windows.
    pub async fn connect(config: &Config, pool: Arc<PgPool>) -> Result<Self, ApplicationError> {
        let store: Arc<dyn CacheStore> = if config.cache.enabled {
            match RedisCacheStore::new(&config.cache.url).await {
                Ok(store) => {
                    info!("Engagement cache using backend at {}", config.cache.url);
                    Arc::new(store)
                }
                Err(e) => {
                    warn!(
                        "Cache backend unreachable, falling back to in-memory store: {}",
                        e
                    );
                    Arc::new(InMemoryCacheStore::new())
                }
            }
        } else {
            info!("Engagement cache using in-memory store");
            Arc::new(InMemoryCacheStore::new())
        };

        Ok(Self::from_parts(
            Arc::new(SqlxPointTransactionRepository::new(Arc::clone(&pool))),
            Arc::new(SqlxBadgeRepository::new(Arc::clone(&pool))),
            Arc::new(SqlxUserRepository::new(pool)),
            store,
            config,
        ))
    }

    /// Assemble from explicit dependencies (used directly by tests).
    pub fn from_parts(
        transactions: Arc<dyn crate::domain::gamification::PointTransactionRepository>,
        badges: Arc<dyn crate::domain::gamification::BadgeRepository>,
        users: Arc<dyn crate::domain::gamification::UserRepository>,
        store: Arc<dyn CacheStore>,
        config: &Config,
    ) -> Self {
        let cache = Arc::new(CacheManager::new(Arc::clone(&store)));
        Self {
            points: Arc::new(PointsService::new(transactions, Arc::clone(&cache), config)),
            badges: Arc::new(BadgeService::new(badges, users, cache, config)),
            rate_limiter: Arc::new(FixedWindowLimiter::new(store, config.rate_limit.clone())),
        }
    }

    pub fn points(&self) -> &PointsService {
        &self.points
    }

    pub fn badges(&self) -> &BadgeService {
        &self.badges
    }

    pub fn rate_limiter(&self) -> &FixedWindowLimiter {
        &self.rate_limiter
    }
}
