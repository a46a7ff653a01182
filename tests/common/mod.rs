//! Common test utilities: in-memory fakes for the persistent store
//!
//! The fakes mirror the relational store's contract (insert-only ledgers,
//! read-time expiry filtering, aggregation) without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use savvy_core::domain::gamification::{
    Badge, BadgeRepository, GamificationError, PointTransaction, PointTransactionRepository,
    UserId, UserRepository,
};
use savvy_core::infrastructure::cache::{CacheError, CacheStore, WindowCount};

/// Insert-only in-memory point transaction ledger
#[derive(Default)]
pub struct InMemoryPointTransactionRepository {
    rows: Mutex<Vec<PointTransaction>>,
}

impl InMemoryPointTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Append a row directly, bypassing the service layer and therefore its
    /// cache invalidation. Used to observe bounded staleness.
    pub fn insert_directly(&self, transaction: PointTransaction) {
        self.rows.lock().unwrap().push(transaction);
    }
}

#[async_trait]
impl PointTransactionRepository for InMemoryPointTransactionRepository {
    async fn insert(&self, transaction: &PointTransaction) -> Result<(), GamificationError> {
        self.rows.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    async fn sum_unexpired(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<i64, GamificationError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| tx.user_id == *user_id && tx.expires_at > now)
            .map(|tx| tx.amount)
            .sum())
    }

    async fn totals_by_user(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(UserId, i64)>, GamificationError> {
        let mut totals: HashMap<UserId, i64> = HashMap::new();
        for tx in self.rows.lock().unwrap().iter() {
            if tx.expires_at > now {
                *totals.entry(tx.user_id).or_default() += tx.amount;
            }
        }
        Ok(totals.into_iter().collect())
    }
}

/// In-memory badge registry
#[derive(Default)]
pub struct InMemoryBadgeRepository {
    rows: Mutex<Vec<Badge>>,
}

impl InMemoryBadgeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn badge_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl BadgeRepository for InMemoryBadgeRepository {
    async fn insert(&self, badge: &Badge) -> Result<(), GamificationError> {
        self.rows.lock().unwrap().push(badge.clone());
        Ok(())
    }

    async fn exists(&self, user_id: &UserId, badge_type: &str) -> Result<bool, GamificationError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.user_id == *user_id && b.badge_type == badge_type))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Badge>, GamificationError> {
        let mut badges: Vec<Badge> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect();
        badges.sort_by(|a, b| b.awarded_at.cmp(&a.awarded_at));
        Ok(badges)
    }

    async fn counts_by_user(&self) -> Result<Vec<(UserId, i64)>, GamificationError> {
        let mut counts: HashMap<UserId, i64> = HashMap::new();
        for badge in self.rows.lock().unwrap().iter() {
            *counts.entry(badge.user_id).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn holder_counts_by_type(&self) -> Result<Vec<(String, u64)>, GamificationError> {
        let mut holders: HashMap<String, std::collections::HashSet<UserId>> = HashMap::new();
        for badge in self.rows.lock().unwrap().iter() {
            holders
                .entry(badge.badge_type.clone())
                .or_default()
                .insert(badge.user_id);
        }
        Ok(holders
            .into_iter()
            .map(|(badge_type, users)| (badge_type, users.len() as u64))
            .collect())
    }
}

/// User repository reporting a fixed registered-user count
pub struct FixedUserRepository {
    pub total: u64,
}

#[async_trait]
impl UserRepository for FixedUserRepository {
    async fn count(&self) -> Result<u64, GamificationError> {
        Ok(self.total)
    }
}

/// Repository whose every operation fails, for persistent-store failure paths
pub struct FailingPointTransactionRepository;

#[async_trait]
impl PointTransactionRepository for FailingPointTransactionRepository {
    async fn insert(&self, _transaction: &PointTransaction) -> Result<(), GamificationError> {
        Err(GamificationError::database("connection refused"))
    }

    async fn sum_unexpired(
        &self,
        _user_id: &UserId,
        _now: DateTime<Utc>,
    ) -> Result<i64, GamificationError> {
        Err(GamificationError::database("connection refused"))
    }

    async fn totals_by_user(
        &self,
        _now: DateTime<Utc>,
    ) -> Result<Vec<(UserId, i64)>, GamificationError> {
        Err(GamificationError::database("connection refused"))
    }
}

/// Cache store whose backend is permanently down: reads miss, writes are
/// dropped, increments error. Exercises the per-operation failure contract.
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration, _tags: &[String]) {}

    async fn invalidate_tag(&self, _tag: &str) -> u64 {
        0
    }

    async fn increment(
        &self,
        _key: &str,
        _ttl_on_first: Duration,
    ) -> Result<WindowCount, CacheError> {
        Err(CacheError::backend("connection refused"))
    }
}
