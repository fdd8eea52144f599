//! Request and response bodies.
//!
//! JSON field names are camelCase. Request types derive `Validate`; response
//! types are built from core read models with `From`.

pub mod auth;
pub mod product;
pub mod store;
pub mod user;

pub use auth::*;
pub use product::*;
pub use store::*;
pub use user::*;
