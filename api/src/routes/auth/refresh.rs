use actix_web::web;

use crate::dto::auth::{RefreshTokenRequest, RefreshTokenResponse};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Handler for POST /api/auth/refresh
///
/// Exchanges a refresh token for a new access token. The refresh token is
/// rotated server-side but only the access token is returned.
///
/// ## Errors
/// - 401: "Invalid or expired refresh token" whatever the cause
pub async fn refresh_token(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state
        .auth_service
        .refresh_token(&ctx, &request.refresh_token)
        .await?;
    Ok(envelope(response.map(RefreshTokenResponse::from)))
}
