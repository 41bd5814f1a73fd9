//! Customer CRUD with per-user scoping, email uniqueness, and the delete guard.

use std::sync::Arc;

use chrono::Utc;

use ledgerly_core::{DomainError, DomainResult, EntityId, UserId};
use ledgerly_customers::{Customer, CustomerDraft, CustomerId};

use crate::store::{CustomerStore, InvoiceStore};

pub struct CustomerService<S> {
    store: Arc<S>,
}

impl<S> CustomerService<S>
where
    S: CustomerStore + InvoiceStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, user: UserId, draft: CustomerDraft) -> DomainResult<Customer> {
        let id = CustomerId::new(EntityId::new());
        // Validate/normalize first so the uniqueness probe sees the stored form.
        let customer = Customer::create(id, user, draft, Utc::now())?;

        if let Some(email) = customer.email() {
            if self.store.customer_by_email(user, email)?.is_some() {
                return Err(DomainError::conflict(
                    "a customer with this email already exists",
                ));
            }
        }

        self.store.insert_customer(customer.clone())?;
        tracing::info!(customer = %customer.id_typed(), "customer created");
        Ok(customer)
    }

    pub fn update(
        &self,
        user: UserId,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> DomainResult<Customer> {
        let mut customer = self
            .store
            .customer(user, id)?
            .ok_or_else(DomainError::not_found)?;
        customer.apply(draft, Utc::now())?;

        if let Some(email) = customer.email() {
            if let Some(other) = self.store.customer_by_email(user, email)? {
                if other.id_typed() != id {
                    return Err(DomainError::conflict(
                        "a customer with this email already exists",
                    ));
                }
            }
        }

        self.store.update_customer(customer.clone())?;
        Ok(customer)
    }

    /// Refused while any invoice still references the customer.
    pub fn delete(&self, user: UserId, id: CustomerId) -> DomainResult<()> {
        let customer = self
            .store
            .customer(user, id)?
            .ok_or_else(DomainError::not_found)?;

        let references = self.store.invoice_count_for_customer(id)?;
        if references > 0 {
            return Err(DomainError::conflict(
                "cannot delete a customer with existing invoices",
            ));
        }

        self.store.delete_customer(user, id)?;
        tracing::info!(customer = %customer.id_typed(), "customer deleted");
        Ok(())
    }

    pub fn get(&self, user: UserId, id: CustomerId) -> DomainResult<Customer> {
        self.store
            .customer(user, id)?
            .ok_or_else(DomainError::not_found)
    }

    /// Newest first.
    pub fn list(&self, user: UserId) -> DomainResult<Vec<Customer>> {
        Ok(self.store.customers(user)?)
    }
}
