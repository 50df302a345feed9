//! The password-reset flow: token creation, mail dispatch, and redemption.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;

use crate::auth::hash_password;
use crate::config::Config;
use crate::email::Mailer;
use crate::error::AppError;
use crate::models::PasswordResetToken;
use crate::repo::{ResetTokenRepo, UserRepo};

/// The response body for a reset request is always this message, whether or
/// not the email is registered.
pub const GENERIC_RESET_MESSAGE: &str = "If the email exists, a reset link has been sent.";

#[derive(Clone)]
pub struct PasswordResetService {
    users: UserRepo,
    tokens: ResetTokenRepo,
    mailer: Arc<dyn Mailer>,
    app_name: String,
    app_domain: String,
    token_ttl_minutes: i64,
}

impl PasswordResetService {
    pub fn new(
        users: UserRepo,
        tokens: ResetTokenRepo,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            app_name: config.app_name.clone(),
            app_domain: config.app_domain.clone(),
            token_ttl_minutes: config.reset_token_ttl_minutes,
        }
    }

    /// Creates a reset token for the account and mails the reset link. An
    /// unknown email returns silently — the caller gets no signal either way,
    /// so account existence cannot be probed.
    pub async fn request_reset(&self, email: &str) -> Result<(), AppError> {
        let user = match self.users.get_by_email(email).await? {
            Some(user) => user,
            None => return Ok(()),
        };

        let record = self.create_token(user.id).await?;
        let reset_link = format!(
            "{}/reset-password?token={}",
            self.app_domain.trim_end_matches('/'),
            record.token
        );
        let body = format!(
            "We received a request to reset your password.\n\n\
             Use the link below to set a new password (expires in {} minutes):\n\
             {}\n\n\
             If you did not request this change, you can ignore this email.",
            self.token_ttl_minutes, reset_link
        );
        self.mailer
            .send(
                &user.email,
                &format!("{} password reset", self.app_name),
                &body,
            )
            .await
    }

    /// Redeems a token: validates it, stores the re-hashed password, and
    /// marks the token used — the last two in one transaction.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let password_len = new_password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(AppError::Validation(
                "password length must be 8-128 characters".into(),
            ));
        }

        let record = self
            .tokens
            .get_by_token(token)
            .await?
            .ok_or_else(|| AppError::Validation("invalid token".into()))?;
        if record.used {
            return Err(AppError::Validation("token already used".into()));
        }
        if record.is_expired(Utc::now()) {
            return Err(AppError::Validation("token expired".into()));
        }
        let user = self
            .users
            .get_by_id(record.user_id)
            .await?
            .ok_or_else(|| AppError::Validation("invalid token".into()))?;

        let new_hash = hash_password(new_password)?;
        self.tokens.redeem(record.id, user.id, &new_hash).await
    }

    async fn create_token(&self, user_id: i64) -> Result<PasswordResetToken, AppError> {
        let expires_at = Utc::now() + Duration::minutes(self.token_ttl_minutes);
        loop {
            let token_value = generate_token_value();
            match self.tokens.insert(user_id, &token_value, expires_at).await {
                Ok(record) => return Ok(record),
                // Astronomically rare collision on the unique token column:
                // regenerate rather than failing the request.
                Err(AppError::Conflict(_)) => continue,
                Err(other) => return Err(other),
            }
        }
    }
}

/// 32 bytes of OS entropy, hex-encoded: unguessable and URL-safe.
fn generate_token_value() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
