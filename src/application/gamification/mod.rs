//! Gamification services
//!
//! `PointsService` and `BadgeService` own the write-then-invalidate flow and
//! all cached aggregate reads; `EngagementService` bundles them with the
//! rate limiter into the single handle the route layer receives.

pub mod badge_service;
pub mod engagement;
pub mod points_service;

pub use badge_service::BadgeService;
pub use engagement::EngagementService;
pub use points_service::PointsService;
