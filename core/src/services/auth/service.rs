//! Main authentication service implementation

use std::sync::Arc;

use sh_shared::types::ApiResponse;

use crate::domain::entities::token::{hash_token, TokenPair};
use crate::domain::entities::user::User;
use crate::domain::value_objects::commands::{
    ChangePassword, Credentials, RegisterUser, ResetPassword,
};
use crate::domain::value_objects::read_models::{AuthSession, RefreshedToken};
use crate::domain::value_objects::request_context::RequestContext;
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::UserRepository;
use crate::services::external::{EmailSender, PasswordHasher};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::reset_email::{reset_email_body, reset_link, RESET_EMAIL_SUBJECT};

/// Authentication service for managing the account lifecycle
pub struct AuthService {
    /// User repository for database operations
    user_repository: Arc<dyn UserRepository>,
    /// Password hashing
    password_hasher: Arc<dyn PasswordHasher>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    /// Outbound email for password resets
    email_sender: Arc<dyn EmailSender>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `password_hasher` - Salted password hashing
    /// * `token_service` - Service for JWT and refresh token management
    /// * `email_sender` - Delivery of password reset emails
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<TokenService>,
        email_sender: Arc<dyn EmailSender>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
            email_sender,
            config,
        }
    }

    /// Register a new customer account and sign it in
    ///
    /// # Returns
    ///
    /// * `Ok(ApiResponse<AuthSession>)` - 201 with the token pair and user
    /// * `Err(AuthError::EmailAlreadyExists)` - Email is taken
    pub async fn register(
        &self,
        ctx: &RequestContext,
        command: RegisterUser,
    ) -> DomainResult<ApiResponse<AuthSession>> {
        if self.user_repository.exists_by_email(&command.email).await? {
            tracing::info!(request_id = %ctx.request_id, "Registration rejected: email already exists");
            return Err(AuthError::EmailAlreadyExists.into());
        }

        let mut user = User::new(command.name, command.email, command.phone_number, String::new());
        user.password_hash = self.password_hasher.hash(&user, &command.password).await?;
        user.record_login();

        // The refresh token needs no id, so the user is written once
        let refresh_token = self.token_service.attach_refresh_token(&mut user);
        let user = self.user_repository.create(user).await?;
        let (access_token, expires_at) = self.token_service.generate_access_token(&user)?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "User registered");

        Ok(ApiResponse::created(
            AuthSession {
                tokens: TokenPair {
                    access_token,
                    refresh_token,
                    expires_at,
                },
                user,
            },
            "Registration successful",
        ))
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        credentials: Credentials,
    ) -> DomainResult<ApiResponse<AuthSession>> {
        let mut user = self
            .user_repository
            .find_by_email(&credentials.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let verification = self
            .password_hasher
            .verify(&user, &user.password_hash, &credentials.password)
            .await;
        if !verification.is_match() {
            tracing::info!(request_id = %ctx.request_id, "Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Login rejected: account deactivated");
            return Err(AuthError::AccountDeactivated.into());
        }

        user.record_login();
        let tokens = self.token_service.issue_token_pair(&mut user)?;
        self.user_repository.update(&user).await?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "User logged in");

        Ok(ApiResponse::success(
            AuthSession { tokens, user },
            "Login successful",
        ))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token is rotated; only the access token is returned.
    pub async fn refresh_token(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
    ) -> DomainResult<ApiResponse<RefreshedToken>> {
        let mut user = self
            .user_repository
            .find_by_refresh_token(&hash_token(refresh_token))
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        let expired = user
            .refresh_token
            .as_ref()
            .map(|token| token.is_expired())
            .unwrap_or(true);
        if expired || !user.is_active {
            tracing::info!(request_id = %ctx.request_id, user_id = user.id, expired, "Refresh rejected");
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let tokens = self.token_service.issue_token_pair(&mut user)?;
        self.user_repository.update(&user).await?;

        tracing::debug!(request_id = %ctx.request_id, user_id = user.id, "Token refreshed");

        Ok(ApiResponse::success(
            RefreshedToken {
                access_token: tokens.access_token,
                expires_at: tokens.expires_at,
            },
            "Token refreshed successfully",
        ))
    }

    /// Clear the caller's refresh token. Idempotent.
    pub async fn logout(&self, ctx: &RequestContext) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.clear_refresh_token();
        self.user_repository.update(&user).await?;

        tracing::info!(request_id = %ctx.request_id, user_id, "User logged out");
        Ok(ApiResponse::success((), "Logout successful"))
    }

    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        command: ChangePassword,
    ) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let verification = self
            .password_hasher
            .verify(&user, &user.password_hash, &command.current_password)
            .await;
        if !verification.is_match() {
            return Err(AuthError::CurrentPasswordIncorrect.into());
        }

        let new_hash = self
            .password_hasher
            .hash(&user, &command.new_password)
            .await?;
        user.change_password(new_hash);
        self.user_repository.update(&user).await?;

        tracing::info!(request_id = %ctx.request_id, user_id, "Password changed");
        Ok(ApiResponse::success((), "Password changed successfully"))
    }

    /// Start a password reset.
    ///
    /// The response is identical whether or not the email is registered, and
    /// failures after the lookup are logged rather than returned.
    pub async fn forgot_password(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> DomainResult<ApiResponse<()>> {
        let response = ApiResponse::success(
            (),
            "If an account with this email exists, a password reset link has been sent",
        );

        let Some(mut user) = self.user_repository.find_by_email(email).await? else {
            tracing::info!(request_id = %ctx.request_id, "Password reset requested for unknown email");
            return Ok(response);
        };

        let (raw_token, stored) = self.token_service.generate_reset_token();
        user.set_password_reset(stored);
        if let Err(e) = self.user_repository.update(&user).await {
            tracing::error!(request_id = %ctx.request_id, user_id = user.id, error = %e, "Failed to store reset token");
            return Ok(response);
        }

        let link = reset_link(&self.config.app_base_url, &raw_token);
        if let Err(e) = self
            .email_sender
            .send(&user.email, RESET_EMAIL_SUBJECT, &reset_email_body(&link))
            .await
        {
            tracing::warn!(request_id = %ctx.request_id, user_id = user.id, error = %e, "Failed to send reset email");
        } else {
            tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Reset email sent");
        }

        Ok(response)
    }

    /// Set a new password using an emailed reset token
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        command: ResetPassword,
    ) -> DomainResult<ApiResponse<()>> {
        let mut user = self.find_by_valid_reset_token(&command.token).await?;
        if user.email != command.email {
            tracing::info!(request_id = %ctx.request_id, "Reset rejected: token belongs to another email");
            return Err(TokenError::InvalidResetToken.into());
        }

        let new_hash = self
            .password_hasher
            .hash(&user, &command.new_password)
            .await?;
        user.change_password(new_hash);
        self.user_repository.update(&user).await?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Password reset");
        Ok(ApiResponse::success((), "Password reset successfully"))
    }

    /// Check a reset token without consuming it
    pub async fn verify_reset_token(
        &self,
        _ctx: &RequestContext,
        token: &str,
    ) -> DomainResult<ApiResponse<()>> {
        self.find_by_valid_reset_token(token).await?;
        Ok(ApiResponse::success((), "Reset token is valid"))
    }

    async fn find_by_valid_reset_token(&self, raw_token: &str) -> DomainResult<User> {
        let user = self
            .user_repository
            .find_by_reset_token(&hash_token(raw_token))
            .await?
            .ok_or(TokenError::InvalidResetToken)?;

        match &user.password_reset {
            Some(reset) if !reset.is_expired() => Ok(user),
            _ => Err(TokenError::InvalidResetToken.into()),
        }
    }
}
