//! JWT authentication middleware and request-context extractors.
//!
//! The middleware reads `Authorization: Bearer <token>`, verifies it with the
//! [`TokenService`](sh_core::services::TokenService) held in [`AppState`] and
//! stores the resulting [`Principal`] in the request extensions.
//!
//! It runs in two modes:
//! 1. Required: a missing or invalid token is answered with a 401 envelope
//! 2. Optional: the request continues anonymously when no valid token is sent
//!
//! Handlers never read the extensions directly; they take [`AuthContext`] or
//! [`OptionalAuth`], which wrap a ready-made [`RequestContext`].

use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use tracing_actix_web::RequestId;

use sh_core::domain::entities::token::Claims;
use sh_core::domain::entities::user::UserRole;
use sh_core::domain::value_objects::request_context::{Principal, RequestContext};
use sh_core::errors::{AuthError, DomainError, TokenError};

use crate::handlers::ApiError;
use crate::state::AppState;

/// Turn verified claims into the caller's principal
pub fn principal_from_claims(claims: &Claims) -> Result<Principal, DomainError> {
    let user_id = claims.user_id().ok_or(TokenError::InvalidAccessToken)?;
    Ok(Principal {
        user_id,
        email: claims.email.clone(),
        role: UserRole::parse(&claims.role),
    })
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy)]
pub struct JwtAuth {
    required: bool,
}

impl JwtAuth {
    /// Reject requests without a valid access token
    pub fn required() -> Self {
        Self { required: true }
    }

    /// Attach the principal when a valid token is present
    pub fn optional() -> Self {
        Self { required: false }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = self.required;

        Box::pin(async move {
            match authenticate(&req) {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                }
                Ok(None) if required => {
                    return Err(ApiError::from(DomainError::from(AuthError::NotAuthenticated)).into());
                }
                Ok(None) => {}
                Err(e) if required => {
                    tracing::debug!(error = %e, path = req.path(), "Access token rejected");
                    return Err(ApiError::from(e).into());
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring invalid token on optional route");
                }
            }

            service.call(req).await
        })
    }
}

/// `Ok(None)` when no bearer token was sent
fn authenticate(req: &ServiceRequest) -> Result<Option<Principal>, DomainError> {
    let Some(token) = extract_bearer_token(req) else {
        return Ok(None);
    };
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| DomainError::internal("token verification is not configured"))?;

    let claims = state.token_service.verify_access_token(&token)?;
    principal_from_claims(&claims).map(Some)
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Build the per-request context from the tracing request id and the
/// principal stored by [`JwtAuth`], if any
pub fn request_context(req: &HttpRequest) -> RequestContext {
    let extensions = req.extensions();
    let request_id = extensions
        .get::<RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_default();

    match extensions.get::<Principal>() {
        Some(principal) => RequestContext::authenticated(request_id, principal.clone()),
        None => RequestContext::anonymous(request_id),
    }
}

/// Extractor for required authentication
#[derive(Debug, Clone)]
pub struct AuthContext(pub RequestContext);

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ctx = request_context(req);
        let result = if ctx.principal.is_some() {
            Ok(AuthContext(ctx))
        } else {
            Err(ApiError::from(DomainError::from(AuthError::NotAuthenticated)).into())
        };
        ready(result)
    }
}

/// Extractor for optional authentication
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub RequestContext);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(OptionalAuth(request_context(req))))
    }
}
