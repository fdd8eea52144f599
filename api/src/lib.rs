//! HTTP layer for the SaleHunter backend.
//!
//! Routes translate requests into service calls through a per-request
//! [`sh_core::domain::RequestContext`]; every response is the
//! `{code, message, data}` envelope.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::AppState;
