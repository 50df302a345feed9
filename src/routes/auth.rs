use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{LoginRequest, RegisterRequest, TokenResponse},
    error::AppError,
    models::password_reset::{ForgotPasswordRequest, ResetPasswordRequest},
    models::UserResponse,
    routes::bearer_header,
    services::{AuthService, PasswordResetService, GENERIC_RESET_MESSAGE},
};

/// Register a new user
///
/// Creates a new account with the `user` role.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = auth.register(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login user
///
/// Authenticates a user and returns a bearer token.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth.login(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

/// Returns the account behind the presented bearer token.
#[get("/me")]
pub async fn me(
    auth: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Requests a password-reset email.
///
/// The response is identical whether or not the email is registered.
#[post("/forgot-password")]
pub async fn forgot_password(
    reset: web::Data<PasswordResetService>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    reset.request_reset(&payload.email).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": GENERIC_RESET_MESSAGE })))
}

/// Redeems a reset token and stores the new password.
#[post("/reset-password")]
pub async fn reset_password(
    reset: web::Data<PasswordResetService>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    reset
        .reset_password(&payload.token, &payload.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password has been updated." })))
}
