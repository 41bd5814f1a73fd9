//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::message::{MailError, OutboundEmail};
use crate::sender::MailSender;

/// SMTP relay configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl SmtpConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASSWORD`,
    /// `FROM_EMAIL` (required) and `FROM_NAME` from the environment, honoring
    /// a local `.env` if present.
    pub fn from_env() -> Result<Self, MailError> {
        dotenvy::dotenv().ok();

        let from_email = std::env::var("FROM_EMAIL").map_err(|_| {
            MailError::Configuration(
                "sender email is not configured; set FROM_EMAIL".to_string(),
            )
        })?;
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| MailError::Configuration("SMTP_HOST is not set".to_string()))?;
        let port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| MailError::Configuration(format!("invalid SMTP_PORT '{raw}'")))?,
            Err(_) => 587,
        };
        let user = std::env::var("SMTP_USER").unwrap_or_default();
        let password = std::env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_name = std::env::var("FROM_NAME").unwrap_or_else(|_| "Ledgerly".to_string());

        Ok(Self {
            host,
            port,
            user,
            password,
            from_email,
            from_name,
        })
    }
}

/// SMTP sender over a STARTTLS relay.
pub struct SmtpMailer {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Configuration(format!("failed to create SMTP relay: {e}")))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { config, transport })
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let from_mailbox: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email)
                .parse()
                .map_err(|e| MailError::Configuration(format!("invalid from address: {e}")))?;

        let to_mailbox: Mailbox = email
            .to_email
            .parse()
            .map_err(|e| MailError::InvalidRecipient(format!("{}: {e}", email.to_email)))?;

        let message = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_content.clone())
            .map_err(|e| MailError::SendFailed(format!("failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        tracing::info!(to = %email.to_email, "email delivered");
        Ok(())
    }
}
