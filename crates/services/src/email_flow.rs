//! The invoice email flow: draft, review, send, and only then `SENT`.
//!
//! Strictly: generate -> caller reviews/edits -> attempt send -> on confirmed
//! delivery, transition `Draft -> Sent` and persist. A generation or delivery
//! failure leaves invoice state untouched.

use std::sync::Arc;

use chrono::Utc;

use ledgerly_ai::{DraftProvider, EmailContext, EmailDraft, LineSummary, generate_email_draft};
use ledgerly_core::{DomainError, DomainResult, UserId};
use ledgerly_customers::Customer;
use ledgerly_invoicing::{Invoice, InvoiceId, InvoiceStatus};
use ledgerly_mailer::{MailError, MailSender, OutboundEmail};

use crate::store::{CustomerStore, InvoiceStore};

pub struct InvoiceEmailService<S> {
    store: Arc<S>,
    drafter: Arc<dyn DraftProvider>,
    mailer: Arc<dyn MailSender>,
}

impl<S> InvoiceEmailService<S>
where
    S: InvoiceStore + CustomerStore,
{
    pub fn new(store: Arc<S>, drafter: Arc<dyn DraftProvider>, mailer: Arc<dyn MailSender>) -> Self {
        Self {
            store,
            drafter,
            mailer,
        }
    }

    /// Generate a draft for review. Does not touch invoice state.
    pub async fn draft_email(&self, user: UserId, id: InvoiceId) -> DomainResult<EmailDraft> {
        let (invoice, customer) = self.load(user, id)?;
        let ctx = email_context(&customer, &invoice);
        generate_email_draft(self.drafter.as_ref(), &ctx)
            .await
            .map_err(|e| DomainError::upstream("ai", e.to_string()))
    }

    /// Send the (possibly edited) draft to the invoice's customer.
    ///
    /// The status changes only after the transport confirms delivery; any
    /// earlier failure returns with the invoice still in its prior state.
    pub async fn send_email(
        &self,
        user: UserId,
        id: InvoiceId,
        draft: &EmailDraft,
    ) -> DomainResult<Invoice> {
        let (mut invoice, customer) = self.load(user, id)?;

        // Fail before any delivery attempt if the invoice can't become SENT.
        invoice.status().check_transition(InvoiceStatus::Sent)?;

        let to_email = customer.email().ok_or_else(|| {
            DomainError::validation("email", "customer has no email address")
        })?;
        let email = OutboundEmail::new(to_email, &draft.subject, &draft.text)
            .map_err(mail_to_domain)?;

        self.mailer
            .send(&email)
            .await
            .map_err(mail_to_domain)?;

        // Delivery confirmed; only now does the status change.
        invoice.transition(InvoiceStatus::Sent, Utc::now())?;
        self.store.update_invoice(invoice.clone())?;
        tracing::info!(invoice = %invoice.number(), to = %email.to_email, "invoice sent");
        Ok(invoice)
    }

    fn load(&self, user: UserId, id: InvoiceId) -> DomainResult<(Invoice, Customer)> {
        let invoice = self
            .store
            .invoice(user, id)?
            .ok_or_else(DomainError::not_found)?;
        let customer = self
            .store
            .customer(user, invoice.customer_id())?
            .ok_or_else(DomainError::not_found)?;
        Ok((invoice, customer))
    }
}

fn email_context(customer: &Customer, invoice: &Invoice) -> EmailContext {
    EmailContext {
        customer_name: customer.name().to_string(),
        invoice_number: invoice.number().to_string(),
        due_date: invoice.due_date().format("%Y-%m-%d").to_string(),
        total_amount: invoice.total().to_string(),
        lines: invoice
            .items()
            .iter()
            .map(|item| LineSummary {
                description: item.description().to_string(),
                quantity: item.quantity(),
                unit_price: item.unit_price().to_string(),
            })
            .collect(),
    }
}

fn mail_to_domain(err: MailError) -> DomainError {
    match err {
        MailError::MissingField(field) => DomainError::validation(field, "is required"),
        other => DomainError::upstream("mail", other.to_string()),
    }
}
