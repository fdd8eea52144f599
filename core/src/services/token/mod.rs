//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - HS256 access token generation and verification
//! - Opaque refresh token issuance (stored hashed on the user)
//! - Password reset token generation

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
