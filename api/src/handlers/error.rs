//! Conversion of failures into the response envelope.
//!
//! Every handler returns [`ApiResult`]. Domain errors keep their own status
//! and client message; unexpected failures are logged in full and reported
//! with the generic message only.

use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use sh_core::errors::DomainError;
use sh_shared::types::response::{response_codes, ApiResponse};

pub type ApiResult = Result<HttpResponse, ApiError>;

/// Errors a handler or extractor can produce
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request DTO failed `validator` checks; keyed by JSON field name
    #[error("Validation failed")]
    Validation(BTreeMap<String, Vec<String>>),

    /// Body, query or path could not be parsed
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Domain(err) => err.status_code(),
            ApiError::Validation(_) | ApiError::BadRequest(_) => response_codes::BAD_REQUEST,
            ApiError::NotFound(_) => response_codes::NOT_FOUND,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Domain(err) => {
                if err.is_server_error() {
                    tracing::error!(error = %err, "Request failed");
                } else {
                    tracing::debug!(error = %err, code = err.status_code(), "Request rejected");
                }
                envelope(ApiResponse::<()>::failure(err.status_code(), err.client_message()))
            }
            ApiError::Validation(fields) => {
                tracing::debug!(?fields, "Request validation failed");
                envelope(ApiResponse {
                    code: response_codes::BAD_REQUEST,
                    message: self.to_string(),
                    data: Some(fields),
                })
            }
            ApiError::BadRequest(message) | ApiError::NotFound(message) => {
                envelope(ApiResponse::<()>::failure(self.code(), message.as_str()))
            }
        }
    }
}

/// Serialize an envelope with the HTTP status mirroring its code
pub fn envelope<T: Serialize>(response: ApiResponse<T>) -> HttpResponse {
    let status = StatusCode::from_u16(response.code).unwrap_or(StatusCode::OK);
    HttpResponse::build(status).json(response)
}
