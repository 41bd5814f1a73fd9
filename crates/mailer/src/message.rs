//! Outbound message shape and mail errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from mail composition and delivery.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("mailer configuration error: {0}")]
    Configuration(String),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Outbound plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to_email: String,
    pub subject: String,
    pub text_content: String,
}

impl OutboundEmail {
    /// All three fields are required and non-empty.
    pub fn new(
        to_email: impl Into<String>,
        subject: impl Into<String>,
        text_content: impl Into<String>,
    ) -> Result<Self, MailError> {
        let email = Self {
            to_email: to_email.into(),
            subject: subject.into(),
            text_content: text_content.into(),
        };

        if email.to_email.trim().is_empty() {
            return Err(MailError::MissingField("to_email"));
        }
        if email.subject.trim().is_empty() {
            return Err(MailError::MissingField("subject"));
        }
        if email.text_content.trim().is_empty() {
            return Err(MailError::MissingField("text_content"));
        }
        Ok(email)
    }
}
