//! Rate limiter types

/// Result of a rate limit check.
///
/// Carries everything the request-gating layer needs for admission headers
/// (limit/remaining/reset) and the Retry-After of a denial response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp (seconds) when the window resets
    pub reset_at: u64,
    /// Seconds to wait before retrying (only set when denied)
    pub retry_after: Option<u64>,
}

impl RateLimitDecision {
    /// Create a new allowed decision
    pub fn allowed(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_at,
            retry_after: None,
        }
    }

    /// Create a new denied decision
    pub fn denied(limit: u32, reset_at: u64, retry_after: u64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at,
            retry_after: Some(retry_after),
        }
    }
}

/// Get current time in milliseconds since Unix epoch
pub fn current_time_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
