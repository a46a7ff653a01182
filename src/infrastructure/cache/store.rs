//! Cache store abstraction
//!
//! The cache is advisory, never authoritative: a lost or flushed backend
//! costs recomputation, not correctness. The failure contract differs per
//! operation and is part of the interface:
//!
//! - `get` reports any backend failure as a miss, never as an error
//! - `set` and `invalidate_tag` are best-effort; failures are logged and
//!   swallowed by the implementation
//! - `increment` reports failures as an explicit error so the caller can
//!   choose fail-open vs fail-closed

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Cache backend errors. Only `increment` surfaces these to callers.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    #[error("Cache backend error: {message}")]
    Backend { message: String },
}

impl CacheError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Result of an atomic counter increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Counter value after this increment. Never decreases within a window.
    pub count: u64,
    /// Absolute expiry of the counter key in Unix milliseconds, derived from
    /// the key's remaining time-to-live.
    pub reset_at_ms: u64,
}

/// Key-value cache with per-key TTL, tag-based invalidation, and an atomic
/// increment-with-expiry.
///
/// Entries are tagged with the logical entities they depend on
/// (`user:<id>`, `leaderboard`, ...) and invalidated by tag lookup. This is
/// portable across backends without pattern-scanning the keyspace.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a serialized value. Backend failure is a miss.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a serialized value with a TTL, indexed under each tag.
    /// Best-effort: failures are logged and swallowed.
    async fn set(&self, key: &str, value: String, ttl: Duration, tags: &[String]);

    /// Delete every entry carrying the tag. Returns the number of entries
    /// removed; best-effort, 0 on backend failure.
    async fn invalidate_tag(&self, tag: &str) -> u64;

    /// Atomically increment a counter in a single backend round trip.
    ///
    /// The key's expiry is set to `ttl_on_first` by the increment that
    /// creates the counter and is never reset by later increments.
    async fn increment(
        &self,
        key: &str,
        ttl_on_first: Duration,
    ) -> Result<WindowCount, CacheError>;
}
