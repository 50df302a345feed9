mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::register_and_login;

async fn login_admin(
    ctx: &common::TestContext,
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
) -> common::TestUser {
    ctx.auth
        .ensure_admin("admin@x.com", "adminsecret1")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "admin@x.com", "password": "adminsecret1" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let admin = ctx.users.get_by_email("admin@x.com").await.unwrap().unwrap();
    common::TestUser {
        id: admin.id,
        email: admin.email,
        token,
    }
}

#[actix_rt::test]
async fn test_admin_routes_are_gated_by_role() {
    let ctx = common::setup().await;
    let app = crate::init_test_app!(ctx);
    let regular = register_and_login(&app, "plain@x.com", "secret123").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(("Authorization", format!("Bearer {}", regular.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", regular.id))
        .insert_header(("Authorization", format!("Bearer {}", regular.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // No token at all is unauthenticated, not forbidden.
    let req = test::TestRequest::get().uri("/api/v1/admin/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_admin_lists_all_accounts() {
    let ctx = common::setup().await;
    let app = crate::init_test_app!(ctx);
    register_and_login(&app, "one@x.com", "secret123").await;
    register_and_login(&app, "two@x.com", "secret123").await;
    let admin = login_admin(&ctx, &app).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(("Authorization", format!("Bearer {}", admin.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(users.len(), 3);
    let emails: Vec<&str> = users.iter().map(|u| u["email"].as_str().unwrap()).collect();
    assert!(emails.contains(&"one@x.com"));
    assert!(emails.contains(&"two@x.com"));
    assert!(emails.contains(&"admin@x.com"));
}

#[actix_rt::test]
async fn test_admin_cannot_delete_their_own_account() {
    let ctx = common::setup().await;
    let app = crate::init_test_app!(ctx);
    let admin = login_admin(&ctx, &app).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", admin.id))
        .insert_header(("Authorization", format!("Bearer {}", admin.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Still present.
    assert!(ctx.users.get_by_id(admin.id).await.unwrap().is_some());
}

#[actix_rt::test]
async fn test_admin_delete_removes_the_account_and_its_data() {
    let ctx = common::setup().await;
    let app = crate::init_test_app!(ctx);
    let victim = register_and_login(&app, "victim@x.com", "secret123").await;
    let admin = login_admin(&ctx, &app).await;

    // The account owns a task and an outstanding reset token.
    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(("Authorization", format!("Bearer {}", victim.token)))
        .set_json(json!({ "title": "Orphan-to-be" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({ "email": "victim@x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", victim.id))
        .insert_header(("Authorization", format!("Bearer {}", admin.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(ctx.users.get_by_id(victim.id).await.unwrap().is_none());
    let (task_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE owner_id = ?")
        .bind(victim.id)
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(task_rows, 0);
    let (token_rows,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM password_reset_tokens WHERE user_id = ?")
            .bind(victim.id)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(token_rows, 0);

    // Deleting a missing account is a 404.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/users/{}", victim.id))
        .insert_header(("Authorization", format!("Bearer {}", admin.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
