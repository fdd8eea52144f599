pub mod auth;

pub use auth::{request_context, AuthContext, JwtAuth, OptionalAuth};
