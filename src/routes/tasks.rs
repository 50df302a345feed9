use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::{
    error::AppError,
    models::{TaskCreate, TaskPage, TaskQuery, TaskUpdate},
    routes::bearer_header,
    services::{AuthService, TaskService},
};

/// Retrieves one page of the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `limit` / `offset` (optional): direct pagination; limit defaults to 10,
///   clamped to [1, 100].
/// - `page` / `page_size` (optional): convenience pair; page 1 maps to
///   offset 0 and wins over `limit`/`offset` when given.
/// - `q` (optional): substring filter on the title.
/// - `is_done` (optional): filter by completion flag.
/// - `sort` (optional): `created_at` ascending, `-created_at` descending.
///
/// The response carries the items plus the total count for the same filter,
/// so clients can render accurate pagination.
#[get("")]
pub async fn list_tasks(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    query: web::Query<TaskQuery>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let (limit, offset) = query.limit_offset();
    let (items, total) = tasks
        .list(
            user.id,
            query.q.as_deref(),
            query.is_done,
            query.sort.as_deref(),
            limit,
            offset,
        )
        .await?;
    Ok(HttpResponse::Ok().json(TaskPage {
        items,
        total,
        limit,
        offset,
    }))
}

/// Creates a task owned by the authenticated user.
#[post("")]
pub async fn create_task(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    payload: web::Json<TaskCreate>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let task = tasks.create(user.id, &payload).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Incomplete tasks whose due date has passed.
#[get("/overdue")]
pub async fn overdue_tasks(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let items = tasks.overdue(user.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Incomplete tasks due today (UTC calendar day).
#[get("/today")]
pub async fn today_tasks(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let items = tasks.due_today(user.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Retrieves a task by id.
///
/// Responds 404 both when the task does not exist and when it belongs to
/// another user.
#[get("/{id}")]
pub async fn get_task(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    task_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let task = tasks.get(task_id.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Full update: the payload must carry a valid title, like create.
#[put("/{id}")]
pub async fn put_task(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    task_id: web::Path<i64>,
    payload: web::Json<TaskCreate>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let payload = payload.into_inner();
    let changes = TaskUpdate {
        title: Some(payload.title),
        description: payload.description,
        is_done: None,
        due_date: payload.due_date,
        tags: payload.tags,
    };
    let task = tasks
        .update(task_id.into_inner(), user.id, &changes)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partial update: absent fields are left unchanged.
#[patch("/{id}")]
pub async fn patch_task(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    task_id: web::Path<i64>,
    payload: web::Json<TaskUpdate>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let task = tasks
        .update(task_id.into_inner(), user.id, &payload)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Soft-deletes a task. The row is retained but permanently excluded from
/// every subsequent query.
#[delete("/{id}")]
pub async fn delete_task(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    task_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    tasks.delete(task_id.into_inner(), user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Marks a task done and refreshes its `updated_at`.
#[post("/{id}/complete")]
pub async fn complete_task(
    auth: web::Data<AuthService>,
    tasks: web::Data<TaskService>,
    task_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let user = auth.resolve_current_user(bearer_header(&req)).await?;
    let task = tasks.mark_complete(task_id.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(task))
}
