//! User service implementation

use std::sync::Arc;

use sh_shared::types::{ApiResponse, Patch};

use crate::domain::entities::user::User;
use crate::domain::value_objects::commands::ProfileUpdate;
use crate::domain::value_objects::request_context::RequestContext;
use crate::errors::{AuthError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::external::ImageStorage;

pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    image_storage: Arc<dyn ImageStorage>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        image_storage: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            user_repository,
            image_storage,
        }
    }

    /// The caller's own profile
    pub async fn get_profile(&self, ctx: &RequestContext) -> DomainResult<ApiResponse<User>> {
        let user_id = ctx.user_id()?;
        let user = self.find_user(user_id).await?;
        Ok(ApiResponse::success(user, "User profile retrieved successfully"))
    }

    pub async fn get_user(
        &self,
        _ctx: &RequestContext,
        user_id: i64,
    ) -> DomainResult<ApiResponse<User>> {
        let user = self.find_user(user_id).await?;
        Ok(ApiResponse::success(user, "User retrieved successfully"))
    }

    /// Sparse profile update. A failed image upload keeps the previous image.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: ProfileUpdate,
    ) -> DomainResult<ApiResponse<User>> {
        let user_id = ctx.user_id()?;
        let mut user = self.find_user(user_id).await?;

        if let Patch::Present(name) = update.name.non_blank() {
            user.rename(name.trim().to_string());
        }
        if let Patch::Present(phone) = update.phone_number.non_blank() {
            user.set_phone_number(phone.trim().to_string());
        }
        if let Patch::Present(image) = update.profile_image.non_blank() {
            let logical_name = format!("users/{user_id}/profile");
            match self.image_storage.upload_base64(&image, &logical_name).await {
                Ok(url) => user.set_profile_image(url),
                Err(e) => {
                    tracing::warn!(request_id = %ctx.request_id, user_id, error = %e, "Profile image upload failed")
                }
            }
        }

        self.user_repository.update(&user).await?;

        tracing::info!(request_id = %ctx.request_id, user_id, "Profile updated");
        Ok(ApiResponse::success(user, "Profile updated successfully"))
    }

    pub async fn get_all_users(&self, _ctx: &RequestContext) -> DomainResult<ApiResponse<Vec<User>>> {
        let users = self.user_repository.find_all().await?;
        Ok(ApiResponse::success(users, "Users retrieved successfully"))
    }

    /// Issued access tokens stay valid until they expire
    pub async fn deactivate_user(
        &self,
        ctx: &RequestContext,
        user_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        self.set_active(ctx, user_id, false).await?;
        Ok(ApiResponse::success((), "User deactivated successfully"))
    }

    pub async fn activate_user(
        &self,
        ctx: &RequestContext,
        user_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        self.set_active(ctx, user_id, true).await?;
        Ok(ApiResponse::success((), "User activated successfully"))
    }

    async fn set_active(&self, ctx: &RequestContext, user_id: i64, active: bool) -> DomainResult<()> {
        let mut user = self.find_user(user_id).await?;
        if active {
            user.activate();
        } else {
            user.deactivate();
        }
        self.user_repository.update(&user).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = ?ctx.optional_user_id(),
            user_id,
            active,
            "User active flag changed"
        );
        Ok(())
    }

    async fn find_user(&self, user_id: i64) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }
}
