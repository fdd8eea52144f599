use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use sh_core::domain::value_objects::commands::{
    ChangePassword, Credentials, RegisterUser, ResetPassword,
};
use sh_core::domain::value_objects::read_models::{AuthSession, RefreshedToken};

use super::user::UserDto;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone_number: request.phone_number.filter(|p| !p.trim().is_empty()),
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_new_password: String,
}

impl From<ChangePasswordRequest> for ChangePassword {
    fn from(request: ChangePasswordRequest) -> Self {
        Self {
            current_password: request.current_password,
            new_password: request.new_password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_new_password: String,
}

impl From<ResetPasswordRequest> for ResetPassword {
    fn from(request: ResetPasswordRequest) -> Self {
        Self {
            token: request.token,
            email: request.email,
            new_password: request.new_password,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResetTokenQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserDto,
}

impl From<AuthSession> for LoginResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
            expires_at: session.tokens.expires_at,
            user: UserDto::from(session.user),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<RefreshedToken> for RefreshTokenResponse {
    fn from(token: RefreshedToken) -> Self {
        Self {
            access_token: token.access_token,
            expires_at: token.expires_at,
        }
    }
}

// Names used by older clients
pub type SignInRequest = LoginRequest;
pub type SignUpRequest = RegisterRequest;
pub type AuthResponse = LoginResponse;
pub type RegisterResponse = LoginResponse;
pub type ChangePasswordDto = ChangePasswordRequest;
pub type ResetPasswordDto = ForgotPasswordRequest;
pub type ResetPasswordConfirmDto = ResetPasswordRequest;
