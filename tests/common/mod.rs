//! Shared fixtures for the integration tests: an in-memory database, fully
//! wired services, and a mailer that captures instead of sending.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use taskvault::auth::{TokenResponse, TokenService};
use taskvault::config::Config;
use taskvault::db;
use taskvault::email::Mailer;
use taskvault::error::AppError;
use taskvault::repo::{ResetTokenRepo, TaskRepo, UserRepo};
use taskvault::services::{AuthService, PasswordResetService, TaskService};

#[derive(Debug)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Captures outbound mail for inspection instead of talking to a relay.
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub struct TestContext {
    pub pool: SqlitePool,
    pub mailer: Arc<MockMailer>,
    pub auth: AuthService,
    pub tasks: TaskService,
    pub reset: PasswordResetService,
    pub reset_tokens: ResetTokenRepo,
    pub users: UserRepo,
}

pub fn test_config() -> Config {
    Config {
        app_name: "TaskVault".to_string(),
        app_domain: "http://localhost:8080".to_string(),
        database_url: "sqlite::memory:".to_string(),
        server_port: 8080,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        access_token_ttl_minutes: 30,
        reset_token_ttl_minutes: 30,
        smtp_host: None,
        smtp_port: 587,
        smtp_user: None,
        smtp_password: None,
        admin_email: None,
        admin_password: None,
    }
}

pub async fn setup() -> TestContext {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::init_db(&pool).await.expect("Failed to apply schema");

    let config = test_config();
    let users = UserRepo::new(pool.clone());
    let tasks = TaskRepo::new(pool.clone());
    let reset_tokens = ResetTokenRepo::new(pool.clone());
    let token_service = TokenService::new(
        config.jwt_secret.clone(),
        config.access_token_ttl_minutes,
    );
    let mailer = Arc::new(MockMailer::default());

    let auth = AuthService::new(users.clone(), token_service);
    let task_service = TaskService::new(tasks);
    let reset = PasswordResetService::new(
        users.clone(),
        reset_tokens.clone(),
        mailer.clone(),
        &config,
    );

    TestContext {
        pool,
        mailer,
        auth,
        tasks: task_service,
        reset,
        reset_tokens,
        users,
    }
}

/// Builds the actix `App` the way `main` does, minus the server.
#[macro_export]
macro_rules! init_test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.auth.clone()))
                .app_data(actix_web::web::Data::new($ctx.tasks.clone()))
                .app_data(actix_web::web::Data::new($ctx.reset.clone()))
                .service(taskvault::routes::health::health)
                .service(actix_web::web::scope("/api/v1").configure(taskvault::routes::config)),
        )
        .await
    };
}

/// Registered user plus a fresh bearer token for it.
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

pub async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> TestUser {
    use actix_web::test;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    let user: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let id = user["id"].as_i64().expect("registration response has an id");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    let token_response: TokenResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(token_response.token_type, "bearer");

    TestUser {
        id,
        email: email.to_string(),
        token: token_response.access_token,
    }
}
