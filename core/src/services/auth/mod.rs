//! Authentication service module
//!
//! This module provides the account lifecycle:
//! - Email/password registration and login
//! - Refresh token rotation and logout
//! - Password change, forgot-password email and reset

mod config;
mod reset_email;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
