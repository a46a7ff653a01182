//! PostgreSQL repository implementations

pub mod badge_repository;
pub mod point_transaction_repository;
pub mod user_repository;

pub use badge_repository::SqlxBadgeRepository;
pub use point_transaction_repository::SqlxPointTransactionRepository;
pub use user_repository::SqlxUserRepository;
