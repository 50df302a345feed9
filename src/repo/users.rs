use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{User, UserRole};

use super::{is_unique_violation, storage_error};

const USER_COLUMNS: &str = "id, email, password_hash, is_active, role, created_at";

#[derive(Clone)]
pub struct UserRepo {
    pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new user. A duplicate email surfaces as `Conflict` — the
    /// unique constraint is the authoritative check even though the service
    /// looks first.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, is_active, role, created_at)
             VALUES (?, ?, 1, ?, ?)
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("email already exists".into())
                } else {
                    storage_error("creating user", e)
                }
            })
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("fetching user by email", e))
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("fetching user by id", e))
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("listing users", e))
    }

    /// Hard-deletes a user together with their tasks and outstanding reset
    /// tokens, in one transaction. Returns false when no such user exists.
    pub async fn delete(&self, user_id: i64) -> Result<bool, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("starting user delete transaction", e))?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("deleting user reset tokens", e))?;

        sqlx::query("DELETE FROM tasks WHERE owner_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("deleting user tasks", e))?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("deleting user", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("committing user delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
