//! Type definitions shared between the core and api layers
//!
//! - `patch` - Explicit present/absent wrapper for sparse updates
//! - `response` - API response envelope and health checks

pub mod patch;
pub mod response;

pub use patch::Patch;
pub use response::{response_codes, ApiResponse, HealthResponse};
