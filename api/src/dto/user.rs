use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use sh_core::domain::entities::user::User;
use sh_core::domain::value_objects::commands::ProfileUpdate;
use sh_shared::types::Patch;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    pub last_login_date: Option<DateTime<Utc>>,
    /// 0 email, 1 Google, 2 Facebook
    pub signed_in_with: i8,
    pub store_id: Option<i64>,
    /// "Seller Account" or "User Account"
    pub account_type: String,
    pub has_store: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            account_type: user.account_type().as_str().to_string(),
            has_store: user.has_store(),
            signed_in_with: user.sign_in_method.tag(),
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            profile_image_url: user.profile_image_url,
            last_login_date: user.last_login_at,
            store_id: user.store_id,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Sparse profile update; omitted, null and blank fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Name must not exceed 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters"))]
    pub phone_number: Option<String>,

    /// Base64 image, optionally with a `data:` prefix
    pub profile_image_base64: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: Patch::from(request.name),
            phone_number: Patch::from(request.phone_number),
            profile_image: Patch::from(request.profile_image_base64),
        }
    }
}

pub type UpdateUserDto = UpdateProfileRequest;
