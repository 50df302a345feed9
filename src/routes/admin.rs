use actix_web::{delete, get, web, HttpRequest, HttpResponse, Responder};

use crate::{
    error::AppError,
    models::UserResponse,
    routes::bearer_header,
    services::AuthService,
};

/// Lists all accounts. Admin only.
#[get("/users")]
pub async fn list_users(
    auth: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    auth.require_admin(&user)?;
    let users = auth.list_users().await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Hard-deletes an account and everything it owns. Admin only; an admin
/// cannot delete their own account here.
#[delete("/users/{id}")]
pub async fn delete_user(
    auth: web::Data<AuthService>,
    target_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    auth.require_admin(&user)?;
    auth.delete_user(&user, target_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
