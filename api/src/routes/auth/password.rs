//! Password change and the forgot/reset flow

use actix_web::web;

use crate::dto::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest, VerifyResetTokenQuery,
};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::{AuthContext, OptionalAuth};
use crate::state::AppState;

/// Handler for POST /api/auth/change-password
pub async fn change_password(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    request: web::Json<ChangePasswordRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.change_password(&ctx, request.into()).await?;
    Ok(envelope(response))
}

/// Handler for POST /api/auth/forgot-password
///
/// Always answers with the same envelope so callers cannot probe for
/// registered emails.
pub async fn forgot_password(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    request: web::Json<ForgotPasswordRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.forgot_password(&ctx, &request.email).await?;
    Ok(envelope(response))
}

/// Handler for POST /api/auth/reset-password
pub async fn reset_password(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    request: web::Json<ResetPasswordRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.reset_password(&ctx, request.into()).await?;
    Ok(envelope(response))
}

/// Handler for GET /api/auth/verify-reset-token?token=
pub async fn verify_reset_token(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    query: web::Query<VerifyResetTokenQuery>,
) -> ApiResult {
    let response = state
        .auth_service
        .verify_reset_token(&ctx, &query.token)
        .await?;
    Ok(envelope(response))
}
