//! Stateless bearer-token issuance and verification.
//!
//! Access tokens are HS256 JWTs binding the subject (the user's email) to an
//! absolute expiry. The service is constructed once from the configuration's
//! secret and TTL; nothing here reads process state.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's email.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_minutes,
        }
    }

    /// Issues a signed token bound to `subject`, expiring after the
    /// configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::minutes(self.ttl_minutes))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: subject.to_owned(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry, returning the bound subject on success
    /// and `None` on any failure — malformed, expired, or bad signature.
    /// Callers never have to branch on the failure kind.
    pub fn verify(&self, token: &str) -> Option<String> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims.sub)
        .ok()
    }
}
