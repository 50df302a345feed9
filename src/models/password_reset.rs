use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// A single-use credential-recovery grant.
///
/// Valid only while `used` is false and `expires_at` lies in the future. The
/// token string itself is random and never leaves the server except inside the
/// reset email.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Payload for requesting a password reset email.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Payload for redeeming a reset token.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 10, max = 256))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "password length must be 8-128 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_check() {
        let now = Utc::now();
        let token = PasswordResetToken {
            id: 1,
            user_id: 1,
            token: "abc".repeat(12),
            expires_at: now + Duration::minutes(30),
            used: false,
            created_at: now,
        };
        assert!(!token.is_expired(now));
        assert!(token.is_expired(now + Duration::minutes(31)));
    }

    #[test]
    fn test_reset_request_validation() {
        let valid = ResetPasswordRequest {
            token: "f".repeat(64),
            new_password: "longenough".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = ResetPasswordRequest {
            token: "f".repeat(64),
            new_password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());

        let stub_token = ResetPasswordRequest {
            token: "abc".to_string(),
            new_password: "longenough".to_string(),
        };
        assert!(stub_token.validate().is_err());
    }
}
