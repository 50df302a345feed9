//! Registration, login, current-user resolution, and admin gating.
//!
//! `resolve_current_user` is the single choke point every task operation
//! depends on: a raw bearer header goes in, an authenticated `User` comes out
//! or the request dies with an authentication failure.

use crate::auth::{hash_password, verify_password, TokenService};
use crate::error::AppError;
use crate::models::{User, UserRole};
use crate::repo::UserRepo;

/// Login failures never reveal which of email or password was wrong.
const INVALID_CREDENTIALS: &str = "invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: UserRepo,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: UserRepo, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Creates an account with the `user` role.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let password_len = password.chars().count();
        if !(5..=100).contains(&password_len) {
            return Err(AppError::Validation("password length must be 5-100".into()));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("invalid email format".into()));
        }
        if self.users.get_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email already exists".into()));
        }
        let password_hash = hash_password(password)?;
        self.users.create(email, &password_hash, UserRole::User).await
    }

    /// Issues an access token bound to the user's email.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.into()))?;
        if !verify_password(password, &user.password_hash) {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.into()));
        }
        self.tokens.issue(&user.email)
    }

    /// Resolves the authenticated user from a raw `Authorization` header
    /// value. Fails unauthenticated when the header is missing, lacks the
    /// `Bearer ` prefix, or carries an invalid token; fails not-found when the
    /// token is valid but its email no longer resolves to a user.
    pub async fn resolve_current_user(
        &self,
        bearer_header: Option<&str>,
    ) -> Result<User, AppError> {
        let token = bearer_header
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Authentication("missing or invalid token".into()))?;
        let email = self
            .tokens
            .verify(token)
            .ok_or_else(|| AppError::Authentication("invalid token".into()))?;
        self.users
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    /// Gates admin-only operations by role.
    pub fn require_admin<'a>(&self, user: &'a User) -> Result<&'a User, AppError> {
        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden("admin access required".into()));
        }
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list_all().await
    }

    /// Hard-deletes an account (admin path). An admin cannot delete their own
    /// account through this path.
    pub async fn delete_user(&self, admin: &User, target_id: i64) -> Result<(), AppError> {
        if admin.id == target_id {
            return Err(AppError::Validation(
                "you cannot delete your own account".into(),
            ));
        }
        if !self.users.delete(target_id).await? {
            return Err(AppError::NotFound("user not found".into()));
        }
        Ok(())
    }

    /// Seeds the configured admin account at startup if its email is not yet
    /// registered. This is the only path that creates an admin.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.users.get_by_email(email).await?.is_some() {
            return Ok(());
        }
        let password_hash = hash_password(password)?;
        self.users
            .create(email, &password_hash, UserRole::Admin)
            .await?;
        log::info!("seeded admin account {}", email);
        Ok(())
    }
}
