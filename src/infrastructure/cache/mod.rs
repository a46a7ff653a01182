//! Caching implementations
//!
//! A thin `CacheStore` abstraction over the distributed cache backend, an
//! in-process store for development and tests, and the cache-aside
//! `CacheManager` that all higher services go through.

pub mod cache_aside;
pub mod memory_store;
pub mod redis_store;
pub mod store;

pub use cache_aside::CacheManager;
pub use memory_store::InMemoryCacheStore;
pub use redis_store::RedisCacheStore;
pub use store::{CacheError, CacheStore, WindowCount};
