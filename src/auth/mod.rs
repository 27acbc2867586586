use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Identity claim carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub exp: i64,
    /// Issued-at; tokens minted elsewhere may leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn new(id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(|hours| hours.checked_mul(3600))
            .and_then(|secs| now.checked_add(secs))
            .unwrap_or(i64::MAX);

        Self {
            id,
            exp,
            iat: Some(now),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// HS256-signed tokens keyed by the configured shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    /// Issue a token for `user_id` using the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.generate_jwt(&Claims::new(user_id, self.expiry_hours))
    }

    pub fn generate_jwt(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates() {
        let keys = TokenKeys::new("secret", 1).unwrap();
        let user = Uuid::new_v4();
        let token = keys.issue(user).unwrap();
        assert_eq!(keys.validate_jwt(&token).unwrap().id, user);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let ours = TokenKeys::new("secret", 1).unwrap();
        let theirs = TokenKeys::new("other", 1).unwrap();
        let token = theirs.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(ours.validate_jwt(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("secret", 1).unwrap();
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: Uuid::new_v4(),
            iat: Some(now - 7200),
            exp: now - 3600,
        };
        let token = keys.generate_jwt(&claims).unwrap();
        assert!(matches!(keys.validate_jwt(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn token_without_issued_at_validates() {
        let keys = TokenKeys::new("secret", 1).unwrap();
        let user = Uuid::new_v4();
        let exp = Utc::now().timestamp() + 3600;
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "id": user, "exp": exp }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let claims = keys.validate_jwt(&token).unwrap();
        assert_eq!(claims.id, user);
        assert_eq!(claims.iat, None);
    }

    #[test]
    fn oversized_lifetime_saturates_expiry() {
        let claims = Claims::new(Uuid::new_v4(), u64::MAX);
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(TokenKeys::new("", 1), Err(JwtError::InvalidSecret)));
    }
}
