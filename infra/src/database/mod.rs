//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management and embedded migrations
//! - Repository implementations; every aggregate write runs in one transaction

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{
    MySqlActivityRepository, MySqlProductRepository, MySqlRatingRepository, MySqlStoreRepository,
    MySqlUserRepository,
};
