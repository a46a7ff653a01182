//! Gamification domain errors

use thiserror::Error;

/// Errors surfaced by the points ledger and badge registry.
///
/// Non-positive point amounts and duplicate badge awards are deliberately not
/// errors; both resolve to a silent no-op at the service layer. Persistent
/// store failures are fatal to the invoking operation and propagate to the
/// caller unchanged, with no retry inside this core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GamificationError {
    #[error("Database error: {message}")]
    Database { message: String },
}

impl GamificationError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
