//! User route handlers

use actix_web::web;

use crate::dto::user::{UpdateProfileRequest, UserDto};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::{AuthContext, JwtAuth};
use crate::state::AppState;

/// Mount `/user` routes; every route requires a valid access token
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .wrap(JwtAuth::required())
            .route("", web::get().to(get_all_users))
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}/deactivate", web::post().to(deactivate_user))
            .route("/{id}/activate", web::post().to(activate_user)),
    );
}

pub async fn get_profile(AuthContext(ctx): AuthContext, state: web::Data<AppState>) -> ApiResult {
    let response = state.user_service.get_profile(&ctx).await?;
    Ok(envelope(response.map(UserDto::from)))
}

/// Handler for PUT /api/user/profile
///
/// Name and phone are sparse. A new profile image replaces
/// `users/{id}/profile`; an upload failure keeps the old image.
pub async fn update_profile(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    request: web::Json<UpdateProfileRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.user_service.update_profile(&ctx, request.into()).await?;
    Ok(envelope(response.map(UserDto::from)))
}

pub async fn get_user(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state.user_service.get_user(&ctx, path.into_inner()).await?;
    Ok(envelope(response.map(UserDto::from)))
}

pub async fn get_all_users(AuthContext(ctx): AuthContext, state: web::Data<AppState>) -> ApiResult {
    let response = state.user_service.get_all_users(&ctx).await?;
    Ok(envelope(response.map(|users| {
        users.into_iter().map(UserDto::from).collect::<Vec<_>>()
    })))
}

pub async fn deactivate_user(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .user_service
        .deactivate_user(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response))
}

pub async fn activate_user(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .user_service
        .activate_user(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response))
}
