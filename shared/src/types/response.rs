//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric codes carried by the response envelope
pub mod response_codes {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_ERROR: u16 = 500;
}

/// Uniform response envelope returned by every endpoint
///
/// ```json
/// { "code": 200, "message": "Login successful", "data": { ... } }
/// ```
///
/// `data` is serialized as `null` on failure rather than omitted so clients
/// can rely on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Envelope code, mirrored by the HTTP status
    pub code: u16,

    /// Human-readable outcome
    pub message: String,

    /// Payload (present on success)
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a 200 response with data
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: response_codes::OK,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a 200 response with the default "Success" message
    pub fn ok(data: T) -> Self {
        Self::success(data, "Success")
    }

    /// Create a 201 response
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            code: response_codes::CREATED,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a failure response with no data
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Whether the code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Map the data to a different type
    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            code: self.code,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

/// Liveness payload for `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: String::from("Healthy"),
            timestamp: Utc::now(),
        }
    }
}
