//! Shared application error types

use thiserror::Error;

use crate::domain::gamification::GamificationError;
use crate::infrastructure::cache::CacheError;

/// Application-level error
///
/// Persistent-store failures pass through unchanged; cache failures never
/// reach here except from construction-time backend setup, because every
/// cache read/write path degrades to a miss or a no-op instead.
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    #[error(transparent)]
    Gamification(#[from] GamificationError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
