//! Configuration validation module

use crate::config::{CacheConfig, DatabaseConfig, GamificationConfig, RateLimitConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Cache configuration error: {message}")]
    Cache { message: String },

    #[error("Database configuration error: {message}")]
    Database { message: String },

    #[error("Rate limit configuration error: {message}")]
    RateLimit { message: String },

    #[error("Gamification configuration error: {message}")]
    Gamification { message: String },
}

impl ValidationError {
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    pub fn gamification(message: impl Into<String>) -> Self {
        Self::Gamification {
            message: message.into(),
        }
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::cache("cache URL cannot be empty"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::cache(format!(
                "cache URL must be a redis:// or rediss:// URL, got '{}'",
                self.url
            )));
        }
        if self.aggregate_ttl_seconds == 0 {
            return Err(ValidationError::cache(
                "aggregate_ttl_seconds must be greater than 0",
            ));
        }
        if self.rarity_ttl_seconds == 0 {
            return Err(ValidationError::cache(
                "rarity_ttl_seconds must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::database("database URL cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(ValidationError::database(
                "max_connections must be greater than 0",
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(ValidationError::database(
                "connect_timeout_seconds must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.default_window_ms == 0 {
            return Err(ValidationError::rate_limit(
                "default_window_ms must be greater than 0",
            ));
        }
        if self.default_limit == 0 {
            return Err(ValidationError::rate_limit(
                "default_limit must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Validate for GamificationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.default_point_expiry_days <= 0 {
            return Err(ValidationError::gamification(
                "default_point_expiry_days must be greater than 0",
            ));
        }
        Ok(())
    }
}
