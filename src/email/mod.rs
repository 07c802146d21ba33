pub mod manager;
pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::AppError;

pub use manager::EmailManager;

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, from: &str, to: &str, subject: &str, html_body: &str)
    -> Result<(), AppError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let message = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::Mail(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Mail(format!("Invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AppError::Mail(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}

/// Stand-in transport for when SMTP is not configured. Nothing leaves the
/// process; the send is only logged.
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(
        &self,
        _from: &str,
        to: &str,
        subject: &str,
        _html_body: &str,
    ) -> Result<(), AppError> {
        tracing::warn!("SMTP not configured. Dropping email to {to}: {subject}");
        Ok(())
    }
}
