use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::PasswordResetToken;

use super::{is_unique_violation, storage_error};

const TOKEN_COLUMNS: &str = "id, user_id, token, expires_at, used, created_at";

#[derive(Clone)]
pub struct ResetTokenRepo {
    pool: SqlitePool,
}

impl ResetTokenRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a fresh token record. A token-string collision surfaces as
    /// `Conflict` so the caller can regenerate and retry.
    pub async fn insert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, AppError> {
        let sql = format!(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at, used, created_at)
             VALUES (?, ?, ?, 0, ?)
             RETURNING {}",
            TOKEN_COLUMNS
        );
        sqlx::query_as::<_, PasswordResetToken>(&sql)
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("reset token collision".into())
                } else {
                    storage_error("creating password reset token", e)
                }
            })
    }

    pub async fn get_by_token(&self, token: &str) -> Result<Option<PasswordResetToken>, AppError> {
        let sql = format!(
            "SELECT {} FROM password_reset_tokens WHERE token = ?",
            TOKEN_COLUMNS
        );
        sqlx::query_as::<_, PasswordResetToken>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("fetching password reset token", e))
    }

    /// The redemption transaction: stores the new credential and flips the
    /// token's used flag. Both updates commit together or neither does — the
    /// used transition is irreversible.
    pub async fn redeem(
        &self,
        token_id: i64,
        user_id: i64,
        new_password_hash: &str,
    ) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("starting redemption transaction", e))?;

        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(new_password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("updating password during redemption", e))?;

        sqlx::query("UPDATE password_reset_tokens SET used = 1 WHERE id = ?")
            .bind(token_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("marking reset token used", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("committing redemption", e))
    }
}
