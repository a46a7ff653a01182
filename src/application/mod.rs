//! Application Layer - Services and shared error types

pub mod errors;
pub mod gamification;

pub use errors::*;
pub use gamification::*;
