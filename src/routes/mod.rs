pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{http::header, web, HttpRequest};

/// Raw `Authorization` header value, handed to the auth service untouched.
pub(crate) fn bearer_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::me)
            .service(auth::forgot_password)
            .service(auth::reset_password),
    )
    .service(
        web::scope("/tasks")
            // Fixed paths must register before the `{id}` matcher.
            .service(tasks::overdue_tasks)
            .service(tasks::today_tasks)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::put_task)
            .service(tasks::patch_task)
            .service(tasks::delete_task)
            .service(tasks::complete_task),
    )
    .service(
        web::scope("/admin")
            .service(admin::list_users)
            .service(admin::delete_user),
    );
}
