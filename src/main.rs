use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use taskvault::auth::TokenService;
use taskvault::config::Config;
use taskvault::db;
use taskvault::email::{Mailer, SmtpMailer, UnconfiguredMailer};
use taskvault::repo::{ResetTokenRepo, TaskRepo, UserRepo};
use taskvault::routes;
use taskvault::services::{AuthService, PasswordResetService, TaskService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::init_db(&pool)
        .await
        .expect("Failed to initialize database schema");

    let users = UserRepo::new(pool.clone());
    let tasks = TaskRepo::new(pool.clone());
    let reset_tokens = ResetTokenRepo::new(pool);
    let token_service = TokenService::new(
        config.jwt_secret.clone(),
        config.access_token_ttl_minutes,
    );

    let mailer: Arc<dyn Mailer> = if config.smtp_host.is_some() {
        Arc::new(SmtpMailer::from_config(&config).expect("Failed to build SMTP transport"))
    } else {
        Arc::new(UnconfiguredMailer)
    };

    let auth_service = AuthService::new(users.clone(), token_service);
    let task_service = TaskService::new(tasks);
    let reset_service = PasswordResetService::new(users, reset_tokens, mailer, &config);

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        auth_service
            .ensure_admin(email, password)
            .await
            .expect("Failed to seed admin account");
    }

    log::info!(
        "Starting {} server at {}",
        config.app_name,
        config.server_url()
    );

    let bind_address = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(task_service.clone()))
            .app_data(web::Data::new(reset_service.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/api/v1").configure(routes::config))
    })
    .bind(bind_address)?
    .run()
    .await
}
