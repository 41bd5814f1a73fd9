//! Invoice creation, editing, status changes, and deletion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult, EntityId, UserId};
use ledgerly_customers::CustomerId;
use ledgerly_invoicing::{
    Invoice, InvoiceId, InvoiceItem, InvoiceItemId, InvoiceNumber, InvoiceStatus, LineItemDraft,
};

use crate::store::{CustomerStore, InvoiceStore, ProductStore};

/// Schema-validated input for creating an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub customer_id: CustomerId,
    pub due_date: DateTime<Utc>,
    pub items: Vec<LineItemDraft>,
}

pub struct InvoiceService<S> {
    store: Arc<S>,
}

impl<S> InvoiceService<S>
where
    S: InvoiceStore + CustomerStore + ProductStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an invoice with its full item set, numbered from the user's
    /// atomic sequence.
    ///
    /// A failed insert after allocation burns a sequence value; gaps are
    /// acceptable, duplicates are not.
    pub fn create(&self, user: UserId, input: CreateInvoice) -> DomainResult<Invoice> {
        // The customer must resolve under the requesting user.
        let customer = self
            .store
            .customer(user, input.customer_id)?
            .ok_or_else(DomainError::not_found)?;

        if input.items.is_empty() {
            return Err(DomainError::validation(
                "items",
                "at least one line item is required",
            ));
        }
        let items = self.build_items(user, &input.items)?;

        let sequence = self.store.next_invoice_sequence(user)?;
        let number = InvoiceNumber::from_sequence(sequence);

        let invoice = Invoice::create(
            InvoiceId::new(EntityId::new()),
            user,
            customer.id_typed(),
            number,
            input.due_date,
            items,
            Utc::now(),
        )?;

        self.store.insert_invoice(invoice.clone())?;
        tracing::info!(
            invoice = %invoice.number(),
            total = %invoice.total(),
            "invoice created"
        );
        Ok(invoice)
    }

    /// Replace a draft invoice's items, recomputing the total.
    pub fn replace_items(
        &self,
        user: UserId,
        id: InvoiceId,
        drafts: Vec<LineItemDraft>,
    ) -> DomainResult<Invoice> {
        let mut invoice = self
            .store
            .invoice(user, id)?
            .ok_or_else(DomainError::not_found)?;

        if drafts.is_empty() {
            return Err(DomainError::validation(
                "items",
                "at least one line item is required",
            ));
        }
        let items = self.build_items(user, &drafts)?;
        invoice.replace_items(items, Utc::now())?;

        self.store.update_invoice(invoice.clone())?;
        Ok(invoice)
    }

    pub fn mark_paid(&self, user: UserId, id: InvoiceId) -> DomainResult<Invoice> {
        self.transition(user, id, InvoiceStatus::Paid)
    }

    /// Explicit caller action; typically driven by an external scheduler once
    /// the due date has passed.
    pub fn mark_overdue(&self, user: UserId, id: InvoiceId) -> DomainResult<Invoice> {
        self.transition(user, id, InvoiceStatus::Overdue)
    }

    /// Delete the invoice; its items go with it in the same operation.
    pub fn delete(&self, user: UserId, id: InvoiceId) -> DomainResult<()> {
        self.store
            .invoice(user, id)?
            .ok_or_else(DomainError::not_found)?;
        self.store.delete_invoice(user, id)?;
        tracing::info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }

    pub fn get(&self, user: UserId, id: InvoiceId) -> DomainResult<Invoice> {
        self.store
            .invoice(user, id)?
            .ok_or_else(DomainError::not_found)
    }

    /// Newest first.
    pub fn list(&self, user: UserId) -> DomainResult<Vec<Invoice>> {
        Ok(self.store.invoices(user)?)
    }

    fn transition(
        &self,
        user: UserId,
        id: InvoiceId,
        to: InvoiceStatus,
    ) -> DomainResult<Invoice> {
        let mut invoice = self
            .store
            .invoice(user, id)?
            .ok_or_else(DomainError::not_found)?;
        invoice.transition(to, Utc::now())?;
        self.store.update_invoice(invoice.clone())?;
        tracing::info!(invoice = %invoice.number(), status = %to, "invoice status changed");
        Ok(invoice)
    }

    fn build_items(
        &self,
        user: UserId,
        drafts: &[LineItemDraft],
    ) -> DomainResult<Vec<InvoiceItem>> {
        drafts
            .iter()
            .map(|draft| {
                let product = match draft.product_id {
                    Some(product_id) => Some(
                        self.store
                            .product(user, product_id)?
                            .ok_or_else(DomainError::not_found)?,
                    ),
                    None => None,
                };
                InvoiceItem::build(
                    InvoiceItemId::new(EntityId::new()),
                    draft,
                    product.as_ref(),
                )
            })
            .collect()
    }
}
