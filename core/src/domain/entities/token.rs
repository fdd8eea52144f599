//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::user::User;

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Display name
    pub name: String,

    /// Role name ("Customer", "Admin")
    pub role: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Creates access-token claims for a user
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user (must already have an id)
    /// * `issuer` - Issuer claim
    /// * `audience` - Audience claim
    /// * `lifetime` - Time until the token expires
    pub fn for_user(user: &User, issuer: &str, audience: &str, lifetime: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Access/refresh token pair handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    /// Raw refresh token; only its hash is persisted
    pub refresh_token: String,
    /// Access token expiry
    pub expires_at: DateTime<Utc>,
}

/// A single-use secret stored as a hash together with its expiry.
///
/// Refresh and password-reset tokens are persisted this way so that the
/// hash and the expiry can only ever be set or cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringToken {
    /// SHA-256 hex digest of the raw token
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl ExpiringToken {
    /// Generates a new random token valid for `lifetime`.
    ///
    /// Returns the raw value (to hand out) and the stored form.
    pub fn generate(lifetime: Duration) -> (String, Self) {
        let raw = Uuid::new_v4().to_string();
        let stored = Self {
            hash: hash_token(&raw),
            expires_at: Utc::now() + lifetime,
        };
        (raw, stored)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks a raw token against the stored hash and expiry
    pub fn accepts(&self, raw: &str) -> bool {
        !self.is_expired() && self.hash == hash_token(raw)
    }
}

/// Hashes a raw token for storage and lookup
pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
