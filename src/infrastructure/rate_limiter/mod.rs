//! Admission control
//!
//! Fixed-window request counting per identity and route, backed by the
//! cache store's atomic increment.

pub mod fixed_window;
pub mod types;

pub use fixed_window::FixedWindowLimiter;
pub use types::RateLimitDecision;
