//! SMTP implementation of the EmailSender trait using lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use sh_core::errors::{DomainError, DomainResult};
use sh_core::services::external::EmailSender;
use sh_shared::config::EmailConfig;

use crate::InfrastructureError;

/// Sends HTML mail through an SMTP relay
#[derive(Clone)]
pub struct SmtpEmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// Uses STARTTLS with credentials when a username is configured, and a
    /// plain connection otherwise (local relays, mail catchers).
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config.from_address.parse().map_err(|_| {
            InfrastructureError::Config(format!("Invalid sender address: {}", config.from_address))
        })?;

        let builder = if config.smtp_username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| InfrastructureError::Config(e.to_string()))?
                .credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ))
        };

        let mailer = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "SMTP email sender initialized"
        );

        Ok(Self { mailer, from })
    }

    fn build_message(&self, to: &str, subject: &str, html_body: &str) -> DomainResult<Message> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|_| DomainError::external("email", format!("Invalid recipient: {}", to)))?;

        Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| InfrastructureError::Email(e.to_string()).into())
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> DomainResult<()> {
        let message = self.build_message(to, subject, html_body)?;

        self.mailer.send(message).await.map_err(|e| {
            tracing::error!(error = %e, "SMTP delivery failed");
            DomainError::from(InfrastructureError::Email(e.to_string()))
        })?;

        tracing::info!(subject, "Email sent");
        Ok(())
    }
}
