//! # SaleHunter Core
//!
//! Core business logic and domain layer for the SaleHunter backend.
//! This crate contains domain entities, business services, repository interfaces,
//! collaborator traits and error types. It has no knowledge of HTTP or SQL.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::{
    AuthError, DomainError, DomainResult, ProductError, StoreError, TokenError, ValidationError,
};
pub use repositories::{
    ActivityRepository, ProductRepository, RatingRepository, StoreRepository, UserRepository,
};
pub use services::{
    AuthService, AuthServiceConfig, EmailSender, GeoQuery, Geocoder, ImageStorage,
    PasswordHasher, PasswordVerification, ProductService, StoreService, TokenService,
    TokenServiceConfig, UserService,
};
