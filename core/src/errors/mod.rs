//! Domain-specific error types and error handling.
//!
//! Services return `DomainResult<T>`. Every expected failure is a typed variant;
//! the presentation layer turns it into a response envelope with
//! [`DomainError::status_code`] and [`DomainError::client_message`].

mod types;

pub use types::{AuthError, ProductError, StoreError, TokenError, ValidationError};

use sh_shared::types::response::response_codes;
use thiserror::Error;

/// Message returned to clients for any unexpected failure
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    BusinessRule { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("{message}")]
    Conflict { message: String },

    #[error("{service} failure: {message}")]
    External { service: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification used for status mapping and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    External,
    Internal,
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::External {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::BusinessRule { .. } | Self::ValidationErr(_) => {
                ErrorKind::Validation
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::External { .. } => ErrorKind::External,
            Self::Internal { .. } => ErrorKind::Internal,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::AccountDeactivated
                | AuthError::NotAuthenticated => ErrorKind::Unauthorized,
                AuthError::EmailAlreadyExists => ErrorKind::Conflict,
                AuthError::UserNotFound => ErrorKind::NotFound,
                AuthError::CurrentPasswordIncorrect => ErrorKind::Validation,
            },
            Self::Token(err) => match err {
                TokenError::InvalidResetToken => ErrorKind::Validation,
                TokenError::TokenGenerationFailed { .. } => ErrorKind::Internal,
                _ => ErrorKind::Unauthorized,
            },
            Self::Store(err) => match err {
                StoreError::AlreadyHasStore => ErrorKind::Conflict,
                StoreError::MissingRequiredFields => ErrorKind::Validation,
                StoreError::NotFound | StoreError::NotFoundForUser => ErrorKind::NotFound,
                StoreError::NotAuthorizedToUpdate | StoreError::NotAuthorizedToDelete => {
                    ErrorKind::Forbidden
                }
            },
            Self::Product(err) => match err {
                ProductError::NotFound => ErrorKind::NotFound,
                ProductError::NotAuthorizedToUpdate | ProductError::NotAuthorizedToDelete => {
                    ErrorKind::Forbidden
                }
                ProductError::StoreRequired | ProductError::InvalidRating => ErrorKind::Validation,
            },
        }
    }

    /// Envelope/HTTP status code for this error.
    ///
    /// Ownership and conflict failures report 400: the envelope code set is
    /// limited to 200, 201, 400, 401, 404 and 500.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Forbidden | ErrorKind::Conflict => {
                response_codes::BAD_REQUEST
            }
            ErrorKind::NotFound => response_codes::NOT_FOUND,
            ErrorKind::Unauthorized => response_codes::UNAUTHORIZED,
            ErrorKind::External | ErrorKind::Internal => response_codes::INTERNAL_ERROR,
        }
    }

    /// Message safe to show to clients; internals are never leaked
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::External | ErrorKind::Internal => GENERIC_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the failure is unexpected and should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= response_codes::INTERNAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DomainError::from(AuthError::InvalidCredentials).status_code(), 401);
        assert_eq!(DomainError::from(AuthError::EmailAlreadyExists).status_code(), 400);
        assert_eq!(DomainError::from(StoreError::NotFound).status_code(), 404);
        assert_eq!(DomainError::from(ProductError::NotAuthorizedToDelete).status_code(), 400);
        assert_eq!(DomainError::from(TokenError::InvalidRefreshToken).status_code(), 401);
        assert_eq!(DomainError::from(TokenError::InvalidResetToken).status_code(), 400);
        assert_eq!(DomainError::internal("db down").status_code(), 500);
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            DomainError::from(AuthError::InvalidCredentials).client_message(),
            "Invalid email or password"
        );
        assert_eq!(DomainError::not_found("Store").client_message(), "Store not found");

        let internal = DomainError::internal("connection refused on 10.0.0.3");
        assert_eq!(internal.client_message(), GENERIC_ERROR_MESSAGE);
        assert!(internal.is_server_error());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = DomainError::from(ValidationError::required("Name"));
        assert_eq!(err.client_message(), "Name is required");
        assert_eq!(err.status_code(), 400);
    }
}
