//! Feature-specific error types for authentication, tokens, stores, products
//! and input validation.
//!
//! The `Display` text of each variant is the message returned to clients.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("user was deactivated")]
    AccountDeactivated,

    #[error("User with this email already exists")]
    EmailAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    #[error("Authentication required")]
    NotAuthenticated,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    InvalidAccessToken,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Token generation failed: {message}")]
    TokenGenerationFailed { message: String },
}

/// Store-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("User already has a store")]
    AlreadyHasStore,

    #[error("Name and Address are required")]
    MissingRequiredFields,

    #[error("Store not found")]
    NotFound,

    #[error("Store not found for this user")]
    NotFoundForUser,

    #[error("You are not authorized to update this store")]
    NotAuthorizedToUpdate,

    #[error("You are not authorized to delete this store")]
    NotAuthorizedToDelete,
}

/// Product-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("You must have a store to create products")]
    StoreRequired,

    #[error("Product not found")]
    NotFound,

    #[error("You are not authorized to update this product")]
    NotAuthorizedToUpdate,

    #[error("You are not authorized to delete this product")]
    NotAuthorizedToDelete,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: String },

    #[error("{field} has an invalid format")]
    InvalidFormat { field: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be greater than zero")]
    NotPositive { field: String },

    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::RequiredField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>) -> Self {
        Self::InvalidFormat { field: field.into() }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::RequiredField { field }
            | Self::InvalidFormat { field }
            | Self::OutOfRange { field, .. }
            | Self::NotPositive { field }
            | Self::TooLong { field, .. } => field,
        }
    }
}
