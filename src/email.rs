//! Outbound mail transport.
//!
//! The reset flow talks to the [`Mailer`] trait; production wires in the
//! lettre SMTP implementation, tests substitute a capturing mock. The core
//! never retries a failed send.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    message::header::ContentType, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::Config;
use crate::error::AppError;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// SMTP mailer over STARTTLS, with optional relay credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let host = config.smtp_host.as_deref().ok_or_else(|| {
            log::error!("SMTP_HOST not configured; cannot send email");
            AppError::Email("SMTP configuration missing".into())
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Email(format!("invalid SMTP relay: {}", e)))?
            .port(config.smtp_port);
        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        let from_address = config.smtp_user.clone().unwrap_or_else(|| {
            format!(
                "no-reply@{}.local",
                config.app_name.to_lowercase().replace(' ', "")
            )
        });

        Ok(Self {
            transport: builder.build(),
            from_address,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| AppError::Email(format!("invalid sender address: {:?}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Email(format!("invalid recipient address: {:?}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Email(e.to_string()))?;

        self.transport.send(message).await.map(|_| ()).map_err(|e| {
            log::error!("failed to send email: {}", e);
            AppError::Email("unable to send email".into())
        })
    }
}

/// Stand-in used when no SMTP host is configured: every send fails with an
/// email error, which the boundary reports as an internal failure.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), AppError> {
        log::error!("SMTP_HOST not configured; cannot send email");
        Err(AppError::Email("SMTP configuration missing".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_unconfigured_mailer_fails_with_email_error() {
        let result = UnconfiguredMailer
            .send("to@example.com", "Subject", "Body")
            .await;
        assert!(matches!(result, Err(AppError::Email(_))));
    }

    #[actix_rt::test]
    async fn test_smtp_mailer_rejects_invalid_recipient() {
        let config = Config {
            app_name: "TaskVault".to_string(),
            app_domain: "http://localhost:8080".to_string(),
            database_url: "sqlite::memory:".to_string(),
            server_port: 8080,
            server_host: "127.0.0.1".to_string(),
            jwt_secret: "test".to_string(),
            access_token_ttl_minutes: 30,
            reset_token_ttl_minutes: 30,
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 587,
            smtp_user: Some("sender@example.com".to_string()),
            smtp_password: Some("secret".to_string()),
            admin_email: None,
            admin_password: None,
        };
        let mailer = SmtpMailer::from_config(&config).unwrap();

        // The message never reaches the transport; address parsing fails
        // first.
        let result = mailer.send("not-an-email", "Subject", "Body").await;
        assert!(matches!(result, Err(AppError::Email(_))));
    }
}
