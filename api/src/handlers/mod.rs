//! Shared handler plumbing: error envelopes and request validation

pub mod error;
pub mod validation;

pub use error::{envelope, ApiError, ApiResult};
pub use validation::validate_request;
