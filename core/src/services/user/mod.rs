//! User service module
//!
//! Profile reads and sparse updates, plus account activation toggles.

mod service;

#[cfg(test)]
mod tests;

pub use service::UserService;
