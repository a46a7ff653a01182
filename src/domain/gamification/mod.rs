//! Points, badges, and leaderboard domain

pub mod entities;
pub mod errors;
pub mod ranking;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use ranking::rank;
pub use repositories::*;
pub use value_objects::*;
