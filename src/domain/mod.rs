//! Domain Layer - Core business logic and entities
//!
//! This module contains the domain entities, value objects, repository
//! interfaces, and the ranking logic of the engagement ledger.

pub mod gamification;

pub use gamification::*;
