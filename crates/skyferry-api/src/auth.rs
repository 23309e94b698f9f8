//! Password hashing and token issuing.
//!
//! Argon2id for passwords, HS256 JWTs for sessions. Validation of incoming
//! tokens lives in `skyferry_common::auth`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use skyferry_common::auth::{Claims, ACCESS_TOKEN, REFRESH_TOKEN};
use uuid::Uuid;

/// Token pair returned on register/login/refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against an Argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn generate_token(
    user_id: Uuid,
    email: &str,
    token_type: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
        token_type: token_type.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Generate a short-lived access token.
pub fn generate_access_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(user_id, email, ACCESS_TOKEN, secret, ttl_secs)
}

/// Generate both access and refresh tokens.
pub fn generate_token_pair(
    user_id: Uuid,
    email: &str,
    secret: &str,
    access_ttl: u64,
    refresh_ttl: u64,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: generate_access_token(user_id, email, secret, access_ttl)?,
        refresh_token: generate_token(user_id, email, REFRESH_TOKEN, secret, refresh_ttl)?,
        expires_in: access_ttl,
        token_type: "Bearer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyferry_common::auth::validate_token;
    use skyferry_common::error::FerryError;

    const SECRET: &str = "test-secret-with-enough-entropy-0123456789";

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong horse battery", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn token_pair_carries_types() {
        let user = Uuid::now_v7();
        let pair = generate_token_pair(user, "ops@example.com", SECRET, 900, 3600).unwrap();
        assert_eq!(pair.expires_in, 900);

        let access = validate_token(&pair.access_token, SECRET).unwrap();
        assert_eq!(access.token_type, ACCESS_TOKEN);
        assert_eq!(access.sub, user.to_string());
        assert_eq!(access.email, "ops@example.com");

        let refresh = validate_token(&pair.refresh_token, SECRET).unwrap();
        assert_eq!(refresh.token_type, REFRESH_TOKEN);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(Uuid::now_v7(), "a@b.co", SECRET, 900).unwrap();
        assert!(matches!(
            validate_token(&token, "another-secret"),
            Err(FerryError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::now_v7().to_string(),
            email: "a@b.co".into(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            token_type: ACCESS_TOKEN.into(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(FerryError::TokenExpired)
        ));
    }
}
