//! `ledgerly-mailer`
//!
//! **Responsibility:** the outbound mail boundary.
//!
//! Delivery is fallible, possibly slow, and gated upon by the invoice status
//! flow: the caller may transition an invoice to `SENT` only after `send`
//! returns `Ok`. This crate owns the message shape, the sender seam, and the
//! SMTP implementation; it knows nothing about invoices.

pub mod message;
pub mod sender;
pub mod smtp;

pub use message::{MailError, OutboundEmail};
pub use sender::{MailSender, MemoryMailer};
pub use smtp::{SmtpConfig, SmtpMailer};
