use std::env;

/// Runtime configuration, read once at process start from environment
/// variables (a `.env` file is loaded by `main` before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    /// Public base URL used when building password-reset links.
    pub app_domain: String,
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    /// Secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Lifetime of issued access tokens, in minutes.
    pub access_token_ttl_minutes: i64,
    /// Lifetime of password-reset tokens, in minutes.
    pub reset_token_ttl_minutes: i64,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// When both are set, an admin account with these credentials is seeded at
    /// startup if the email is not yet registered.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "TaskVault".to_string()),
            app_domain: env::var("APP_DOMAIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://taskvault.db".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ACCESS_TOKEN_TTL_MINUTES must be a number"),
            reset_token_ttl_minutes: env::var("RESET_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("RESET_TOKEN_TTL_MINUTES must be a number"),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .expect("SMTP_PORT must be a number"),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
