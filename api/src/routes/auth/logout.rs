use actix_web::web;

use crate::handlers::{envelope, ApiResult};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/auth/logout
///
/// Clears the caller's refresh token. Calling it twice is harmless.
pub async fn logout(AuthContext(ctx): AuthContext, state: web::Data<AppState>) -> ApiResult {
    let response = state.auth_service.logout(&ctx).await?;
    Ok(envelope(response))
}
