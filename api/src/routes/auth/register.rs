use actix_web::web;

use crate::dto::auth::{LoginResponse, RegisterRequest};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Handler for POST /api/auth/register
///
/// Creates a customer account and signs it in. Answers 201 with the same
/// payload as login; a taken email is a 400.
pub async fn register(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.register(&ctx, request.into()).await?;
    Ok(envelope(response.map(LoginResponse::from)))
}
