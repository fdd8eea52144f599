//! Per-request context handed explicitly to every service call.

use crate::domain::entities::user::UserRole;
use crate::errors::{AuthError, DomainResult};

/// The authenticated caller, taken from verified access-token claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

/// Request id plus the optional authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub request_id: String,
    pub principal: Option<Principal>,
}

impl RequestContext {
    pub fn anonymous(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: None,
        }
    }

    pub fn authenticated(request_id: impl Into<String>, principal: Principal) -> Self {
        Self {
            request_id: request_id.into(),
            principal: Some(principal),
        }
    }

    /// Id of the caller, or `NotAuthenticated` for anonymous requests
    pub fn user_id(&self) -> DomainResult<i64> {
        self.principal
            .as_ref()
            .map(|p| p.user_id)
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    pub fn optional_user_id(&self) -> Option<i64> {
        self.principal.as_ref().map(|p| p.user_id)
    }
}
