//! Redis-backed cache store
//!
//! Works against any Redis-protocol backend (Redis, Dragonfly, Valkey).
//! Tag indexes are plain sets under `tag:{tag}`; invalidation reads the set
//! and deletes its members, avoiding keyspace SCANs entirely.

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::store::{CacheError, CacheStore, WindowCount};

/// Fixed-window increment: INCR, set expiry only when the increment created
/// the key, and return the count together with the remaining TTL. One round
/// trip, so concurrent increments for the same key never undercount.
const INCREMENT_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
return {count, ttl}
"#;

/// Redis cache store implementation
pub struct RedisCacheStore {
    connection_manager: ConnectionManager,
    increment_script: redis::Script,
}

impl RedisCacheStore {
    /// Connect to the cache backend and verify the connection with a PING.
    pub async fn new(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            CacheError::backend(format!("Failed to create Redis client: {}", e))
        })?;

        let connection_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to create Redis connection manager: {}", e);
            CacheError::backend(format!("Failed to connect to cache backend: {}", e))
        })?;

        let mut conn = connection_manager.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to ping cache backend: {}", e);
                CacheError::backend(format!("Failed to ping cache backend: {}", e))
            })?;

        debug!("Connected to cache backend at {}", url);

        Ok(Self {
            connection_manager,
            increment_script: redis::Script::new(INCREMENT_SCRIPT),
        })
    }

    fn tag_key(tag: &str) -> String {
        format!("tag:{}", tag)
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection_manager.clone();

        match redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
        {
            Ok(Some(value)) => {
                debug!("Cache hit for key: {}", key);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for key: {}", key);
                None
            }
            Err(e) => {
                // Transient backend failures degrade to a miss by contract.
                warn!("Cache GET failed for key {}, treating as miss: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration, tags: &[String]) {
        let mut conn = self.connection_manager.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        if let Err(e) = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<String>(&mut conn)
            .await
        {
            warn!("Cache SET failed for key {}: {}", key, e);
            return;
        }

        for tag in tags {
            let tag_key = Self::tag_key(tag);
            if let Err(e) = redis::cmd("SADD")
                .arg(&tag_key)
                .arg(key)
                .query_async::<i64>(&mut conn)
                .await
            {
                warn!("Cache SADD failed for tag {}: {}", tag_key, e);
                continue;
            }
            // Keep the index alive at least as long as its newest member.
            // A set just created by SADD has no expiry, and GT treats a key
            // without TTL as infinite and refuses to set one, so NX seeds
            // the initial expiry and GT only ever extends it. A member whose
            // entry already lapsed just makes invalidation DEL a missing key.
            let tag_ttl = ttl_seconds + 60;
            if let Err(e) = redis::cmd("EXPIRE")
                .arg(&tag_key)
                .arg(tag_ttl)
                .arg("NX")
                .query_async::<i64>(&mut conn)
                .await
            {
                warn!("Cache EXPIRE failed for tag {}: {}", tag_key, e);
                continue;
            }
            if let Err(e) = redis::cmd("EXPIRE")
                .arg(&tag_key)
                .arg(tag_ttl)
                .arg("GT")
                .query_async::<i64>(&mut conn)
                .await
            {
                warn!("Cache EXPIRE failed for tag {}: {}", tag_key, e);
            }
        }

        debug!("Cached key {} with TTL {}s, tags {:?}", key, ttl_seconds, tags);
    }

    async fn invalidate_tag(&self, tag: &str) -> u64 {
        let mut conn = self.connection_manager.clone();
        let tag_key = Self::tag_key(tag);

        let members: Vec<String> = match redis::cmd("SMEMBERS")
            .arg(&tag_key)
            .query_async(&mut conn)
            .await
        {
            Ok(members) => members,
            Err(e) => {
                warn!("Cache SMEMBERS failed for tag {}: {}", tag_key, e);
                return 0;
            }
        };

        if members.is_empty() {
            return 0;
        }

        let mut del = redis::cmd("DEL");
        for member in &members {
            del.arg(member);
        }
        del.arg(&tag_key);

        match del.query_async::<i64>(&mut conn).await {
            Ok(deleted) => {
                let entries = (deleted as u64).saturating_sub(1);
                debug!("Invalidated {} cache entries for tag {}", entries, tag);
                entries
            }
            Err(e) => {
                warn!("Cache DEL failed for tag {}: {}", tag_key, e);
                0
            }
        }
    }

    async fn increment(
        &self,
        key: &str,
        ttl_on_first: Duration,
    ) -> Result<WindowCount, CacheError> {
        let mut conn = self.connection_manager.clone();
        let ttl_ms = ttl_on_first.as_millis().max(1) as u64;

        let (count, pttl): (i64, i64) = self
            .increment_script
            .key(key)
            .arg(ttl_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Cache INCR failed for key {}: {}", key, e);
                CacheError::backend(format!("Redis INCR error: {}", e))
            })?;

        // PTTL reports -1/-2 when the key has no expiry or vanished between
        // script steps; fall back to the window length.
        let remaining_ms = if pttl > 0 { pttl as u64 } else { ttl_ms };

        Ok(WindowCount {
            count: count.max(0) as u64,
            reset_at_ms: Self::current_time_millis() + remaining_ms,
        })
    }
}
