use actix_web::web;

use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Handler for POST /api/auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "shopper@example.com", "password": "secret123" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "code": 200,
///     "message": "Login successful",
///     "data": {
///         "accessToken": "eyJ...",
///         "refreshToken": "3f0c...",
///         "expiresAt": "2024-05-01T10:15:00Z",
///         "user": { "id": 7, "accountType": "User Account", ... }
///     }
/// }
/// ```
///
/// ## Errors
/// - 400: validation failure
/// - 401: "Invalid email or password" (unknown email and wrong password alike),
///   or a deactivated account
pub async fn login(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.auth_service.login(&ctx, request.into()).await?;
    Ok(envelope(response.map(LoginResponse::from)))
}
