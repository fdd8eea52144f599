//! Repository interfaces for persistence.
//!
//! Each aggregate-level write runs in a single transaction inside the
//! implementation; services never coordinate transactions themselves.

pub mod activity;
pub mod product;
pub mod rating;
pub mod store;
pub mod user;

#[cfg(any(test, feature = "mocks"))]
pub mod memory;

pub use activity::ActivityRepository;
pub use product::ProductRepository;
pub use rating::RatingRepository;
pub use store::StoreRepository;
pub use user::UserRepository;

#[cfg(any(test, feature = "mocks"))]
pub use memory::MockDatabase;
