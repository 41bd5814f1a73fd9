//! The sender seam and the in-memory implementation.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::message::{MailError, OutboundEmail};

/// A transport that attempts delivery of one message.
///
/// `Ok` means the transport confirmed acceptance; callers gate side effects
/// (like the invoice `SENT` transition) on that confirmation.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Recording sender for tests and offline development.
///
/// Stores every accepted message; can be switched into a failing mode to
/// exercise delivery-failure paths.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.failing.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages accepted so far, in order.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl MailSender for MemoryMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::SendFailed(
                "simulated transport failure".to_string(),
            ));
        }
        self.sent
            .lock()
            .map_err(|_| MailError::SendFailed("mailer lock poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}
