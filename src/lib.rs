//! Savvy Core - Engagement substrate for the Savvy financial-education platform
//!
//! This crate provides the caching-and-admission layer together with the
//! points/badge ledger and its ranked leaderboards:
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] — Entities, value objects, repository interfaces, and ranking
//! - [`application`] — Gamification services and shared error types
//! - [`infrastructure`] — Cache store, rate limiter, and PostgreSQL repositories
//! - [`logging`] — Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! savvy-core/
//! ├── domain/           # Pure business logic
//! │   ├── entities      # PointTransaction, Badge, derived views
//! │   ├── value_objects # UserId
//! │   ├── repositories  # Persistent-store interfaces
//! │   └── ranking       # RANK-semantics leaderboard computation
//! ├── application/      # PointsService, BadgeService, EngagementService
//! ├── infrastructure/   # Redis cache, fixed-window limiter, SQLx repos
//! └── config/           # Configuration management
//! ```
//!
//! The persistent store is the single source of truth for transactions and
//! badges. The cache is advisory: losing it forces recomputation, never
//! corrupts the ledger.
//!
//! # Configuration
//!
//! ```rust,ignore
//! use savvy_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `SAVVY__` prefix with double underscore
//! separators:
//!
//! ```bash
//! SAVVY__CACHE__URL=redis://cache:6379
//! SAVVY__RATE_LIMIT__DEFAULT_LIMIT=120
//! ```
//!
//! # Logging
//!
//! ```rust,ignore
//! use savvy_core::init_tracing;
//!
//! init_tracing("info")?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
