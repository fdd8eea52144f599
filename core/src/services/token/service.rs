//! Main token service implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, ExpiringToken, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};

use super::config::{TokenServiceConfig, RESET_TOKEN_EXPIRY_HOURS};

/// Service for issuing and verifying JWT access tokens and opaque
/// refresh/reset tokens
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn access_token_lifetime(&self) -> Duration {
        Duration::minutes(self.config.access_token_expiry_minutes)
    }

    pub fn refresh_token_lifetime(&self) -> Duration {
        Duration::days(self.config.refresh_token_expiry_days)
    }

    /// Issues a new access/refresh pair for a persisted user.
    ///
    /// The refresh token is written onto `user` (replacing any previous one);
    /// the caller persists the user.
    pub fn issue_token_pair(&self, user: &mut User) -> Result<TokenPair, DomainError> {
        let refresh_token = self.attach_refresh_token(user);
        let (access_token, expires_at) = self.generate_access_token(user)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Generates a refresh token, stores its hash on `user` and returns the raw value.
    ///
    /// Does not need a user id, so it can run before the user is inserted.
    pub fn attach_refresh_token(&self, user: &mut User) -> String {
        let (raw, stored) = ExpiringToken::generate(self.refresh_token_lifetime());
        user.set_refresh_token(stored);
        raw
    }

    /// Signs an access token for `user`
    ///
    /// # Returns
    ///
    /// The encoded JWT and its expiry
    pub fn generate_access_token(
        &self,
        user: &User,
    ) -> Result<(String, DateTime<Utc>), DomainError> {
        let claims = Claims::for_user(
            user,
            &self.config.issuer,
            &self.config.audience,
            self.access_token_lifetime(),
        );
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or_else(|| {
            TokenError::TokenGenerationFailed {
                message: format!("expiry {} out of range", claims.exp),
            }
        })?;
        let token = self.encode_jwt(&claims)?;
        Ok((token, expires_at))
    }

    /// Generates a password reset token valid for one hour
    ///
    /// # Returns
    ///
    /// The raw token (to email) and its stored form
    pub fn generate_reset_token(&self) -> (String, ExpiringToken) {
        ExpiringToken::generate(Duration::hours(RESET_TOKEN_EXPIRY_HOURS))
    }

    /// Encodes claims into a JWT
    fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            TokenError::TokenGenerationFailed {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Verifies an access token and returns the claims
    ///
    /// Signature, issuer, audience, expiry and not-before are checked with
    /// zero leeway. Every failure is reported as the same `InvalidAccessToken`.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Access token rejected");
                DomainError::Token(TokenError::InvalidAccessToken)
            })?;

        if token_data.claims.user_id().is_none() {
            tracing::debug!(sub = %token_data.claims.sub, "Access token subject is not a user id");
            return Err(TokenError::InvalidAccessToken.into());
        }

        Ok(token_data.claims)
    }
}
