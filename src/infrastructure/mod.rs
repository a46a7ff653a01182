//! Infrastructure Layer - External concerns and implementations
//!
//! This module handles the cache backend, admission control, and PostgreSQL
//! data access.

pub mod cache;
pub mod rate_limiter;
pub mod repositories;

pub use cache::*;
pub use rate_limiter::*;
pub use repositories::*;
