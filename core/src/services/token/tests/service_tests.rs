//! Unit tests for token service

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::domain::entities::token::{hash_token, Claims};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenService, TokenServiceConfig};

fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: "test-secret-key-for-unit-tests".to_string(),
        issuer: "SaleHunter".to_string(),
        audience: "SaleHunterUsers".to_string(),
        access_token_expiry_minutes: 60,
        refresh_token_expiry_days: 7,
    }
}

fn persisted_user() -> User {
    let mut user = User::new("Nour", "nour@example.com", None, "hash".to_string());
    user.id = 11;
    user
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_issue_token_pair_writes_hashed_refresh_token() {
    let service = TokenService::new(test_config());
    let mut user = persisted_user();

    let pair = service.issue_token_pair(&mut user).unwrap();

    let stored = user.refresh_token.as_ref().unwrap();
    assert_eq!(stored.hash, hash_token(&pair.refresh_token));
    assert!(stored.expires_at > Utc::now() + Duration::days(6));
    assert!(pair.expires_at > Utc::now() + Duration::minutes(59));
    assert!(pair.expires_at <= Utc::now() + Duration::minutes(60));
}

#[test]
fn test_access_token_round_trip() {
    let service = TokenService::new(test_config());
    let user = persisted_user();

    let (token, _) = service.generate_access_token(&user).unwrap();
    let claims = service.verify_access_token(&token).unwrap();

    assert_eq!(claims.user_id(), Some(11));
    assert_eq!(claims.email, "nour@example.com");
    assert_eq!(claims.name, "Nour");
    assert_eq!(claims.role, "Customer");
    assert_eq!(claims.iss, "SaleHunter");
    assert_eq!(claims.aud, "SaleHunterUsers");
}

#[test]
fn test_each_token_has_unique_jti() {
    let service = TokenService::new(test_config());
    let user = persisted_user();

    let (first, _) = service.generate_access_token(&user).unwrap();
    let (second, _) = service.generate_access_token(&user).unwrap();

    let first = service.verify_access_token(&first).unwrap();
    let second = service.verify_access_token(&second).unwrap();
    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_expired_token_is_rejected_without_leeway() {
    let service = TokenService::new(test_config());
    let mut claims = Claims::for_user(
        &persisted_user(),
        "SaleHunter",
        "SaleHunterUsers",
        Duration::minutes(60),
    );
    claims.iat -= 120;
    claims.nbf -= 120;
    claims.exp = Utc::now().timestamp() - 1;

    let token = sign(&claims, "test-secret-key-for-unit-tests");

    assert!(matches!(
        service.verify_access_token(&token),
        Err(DomainError::Token(TokenError::InvalidAccessToken))
    ));
}

#[test]
fn test_wrong_issuer_audience_or_secret_is_rejected() {
    let service = TokenService::new(test_config());
    let user = persisted_user();

    let wrong_issuer = Claims::for_user(&user, "Other", "SaleHunterUsers", Duration::minutes(5));
    let wrong_audience = Claims::for_user(&user, "SaleHunter", "Other", Duration::minutes(5));
    let valid = Claims::for_user(&user, "SaleHunter", "SaleHunterUsers", Duration::minutes(5));

    for token in [
        sign(&wrong_issuer, "test-secret-key-for-unit-tests"),
        sign(&wrong_audience, "test-secret-key-for-unit-tests"),
        sign(&valid, "some-other-secret"),
        "not-a-jwt".to_string(),
    ] {
        let err = service.verify_access_token(&token).unwrap_err();
        assert_eq!(err.client_message(), "Invalid or expired token");
    }
}

#[test]
fn test_not_yet_valid_token_is_rejected() {
    let service = TokenService::new(test_config());
    let mut claims = Claims::for_user(
        &persisted_user(),
        "SaleHunter",
        "SaleHunterUsers",
        Duration::minutes(60),
    );
    claims.nbf = Utc::now().timestamp() + 300;

    let token = sign(&claims, "test-secret-key-for-unit-tests");

    assert!(service.verify_access_token(&token).is_err());
}

#[test]
fn test_reset_token_expires_in_one_hour() {
    let service = TokenService::new(test_config());

    let (raw, stored) = service.generate_reset_token();

    assert!(stored.accepts(&raw));
    assert!(stored.expires_at <= Utc::now() + Duration::hours(1));
    assert!(stored.expires_at > Utc::now() + Duration::minutes(59));
}
