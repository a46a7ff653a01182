//! In-memory cache store for development and single-instance deployments
//!
//! Mirrors the backend store's semantics (TTLs, tag indexes, fixed-window
//! counters) without a network hop. Expiry is checked lazily on read;
//! `cleanup` sweeps lapsed entries.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use super::store::{CacheError, CacheStore, WindowCount};

struct StoredEntry {
    value: String,
    expires_at_ms: u64,
    tags: Vec<String>,
}

struct CounterEntry {
    count: u64,
    expires_at_ms: u64,
}

/// In-memory cache store
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
    tag_index: RwLock<HashMap<String, HashSet<String>>>,
    counters: RwLock<HashMap<String, CounterEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    /// Sweep expired entries and counters.
    pub async fn cleanup(&self) {
        let now = Self::current_time_millis();

        let removed: Vec<(String, Vec<String>)> = {
            let mut entries = self.entries.write().await;
            let lapsed: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.expires_at_ms <= now)
                .map(|(key, _)| key.clone())
                .collect();
            lapsed
                .into_iter()
                .filter_map(|key| entries.remove(&key).map(|entry| (key, entry.tags)))
                .collect()
        };

        if !removed.is_empty() {
            let mut index = self.tag_index.write().await;
            for (key, tags) in &removed {
                for tag in tags {
                    if let Some(keys) = index.get_mut(tag) {
                        keys.remove(key);
                        if keys.is_empty() {
                            index.remove(tag);
                        }
                    }
                }
            }
        }

        {
            let mut counters = self.counters.write().await;
            counters.retain(|_, counter| counter.expires_at_ms > now);
        }

        debug!("Completed in-memory cache cleanup");
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at_ms > Self::current_time_millis())
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: String, ttl: Duration, tags: &[String]) {
        let expires_at_ms = Self::current_time_millis() + ttl.as_millis() as u64;

        {
            let mut index = self.tag_index.write().await;
            for tag in tags {
                index.entry(tag.clone()).or_default().insert(key.to_string());
            }
        }

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at_ms,
                tags: tags.to_vec(),
            },
        );
    }

    async fn invalidate_tag(&self, tag: &str) -> u64 {
        let keys = {
            let mut index = self.tag_index.write().await;
            index.remove(tag).unwrap_or_default()
        };

        if keys.is_empty() {
            return 0;
        }

        let mut removed = 0u64;
        let mut entries = self.entries.write().await;
        for key in keys {
            if entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        debug!("Invalidated {} cache entries for tag {}", removed, tag);
        removed
    }

    async fn increment(
        &self,
        key: &str,
        ttl_on_first: Duration,
    ) -> Result<WindowCount, CacheError> {
        let now = Self::current_time_millis();
        let ttl_ms = ttl_on_first.as_millis() as u64;
        let mut counters = self.counters.write().await;

        let counter = counters
            .entry(key.to_string())
            .and_modify(|counter| {
                if counter.expires_at_ms > now {
                    // Expiry was set by the first increment and stays put.
                    counter.count += 1;
                } else {
                    counter.count = 1;
                    counter.expires_at_ms = now + ttl_ms;
                }
            })
            .or_insert_with(|| CounterEntry {
                count: 1,
                expires_at_ms: now + ttl_ms,
            });

        Ok(WindowCount {
            count: counter.count,
            reset_at_ms: counter.expires_at_ms,
        })
    }
}
