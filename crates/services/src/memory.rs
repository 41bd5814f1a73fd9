//! In-memory store.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use ledgerly_core::UserId;
use ledgerly_customers::{Customer, CustomerId};
use ledgerly_invoicing::{Invoice, InvoiceId};
use ledgerly_products::{Product, ProductId};

use crate::store::{CustomerStore, InvoiceStore, ProductStore, StoreError};

/// `RwLock`ed-map implementation of all three store traits.
///
/// The per-user invoice sequence is advanced under the write lock, so two
/// concurrent creators can never observe the same value.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    products: RwLock<HashMap<ProductId, Product>>,
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
    sequences: RwLock<HashMap<UserId, u64>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerStore for InMemoryStore {
    fn insert_customer(&self, customer: Customer) -> Result<(), StoreError> {
        let mut customers = self.customers.write().map_err(|_| StoreError::LockPoisoned)?;
        match customers.entry(customer.id_typed()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(customer.id_typed().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(customer);
                Ok(())
            }
        }
    }

    fn update_customer(&self, customer: Customer) -> Result<(), StoreError> {
        let mut customers = self.customers.write().map_err(|_| StoreError::LockPoisoned)?;
        match customers.entry(customer.id_typed()) {
            Entry::Occupied(mut slot) => {
                slot.insert(customer);
                Ok(())
            }
            Entry::Vacant(_) => Err(StoreError::RowNotFound),
        }
    }

    fn delete_customer(&self, user: UserId, id: CustomerId) -> Result<(), StoreError> {
        let mut customers = self.customers.write().map_err(|_| StoreError::LockPoisoned)?;
        match customers.get(&id) {
            Some(existing) if existing.user_id() == user => {
                customers.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::RowNotFound),
        }
    }

    fn customer(&self, user: UserId, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let customers = self.customers.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(customers
            .get(&id)
            .filter(|c| c.user_id() == user)
            .cloned())
    }

    fn customers(&self, user: UserId) -> Result<Vec<Customer>, StoreError> {
        let customers = self.customers.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut rows: Vec<Customer> = customers
            .values()
            .filter(|c| c.user_id() == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id_typed().0.as_uuid().cmp(a.id_typed().0.as_uuid()))
        });
        Ok(rows)
    }

    fn customer_by_email(
        &self,
        user: UserId,
        email: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let customers = self.customers.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(customers
            .values()
            .find(|c| c.user_id() == user && c.email() == Some(email))
            .cloned())
    }
}

impl ProductStore for InMemoryStore {
    fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::LockPoisoned)?;
        match products.entry(product.id_typed()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(product.id_typed().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(product);
                Ok(())
            }
        }
    }

    fn update_product(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::LockPoisoned)?;
        match products.entry(product.id_typed()) {
            Entry::Occupied(mut slot) => {
                slot.insert(product);
                Ok(())
            }
            Entry::Vacant(_) => Err(StoreError::RowNotFound),
        }
    }

    fn delete_product(&self, user: UserId, id: ProductId) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::LockPoisoned)?;
        match products.get(&id) {
            Some(existing) if existing.user_id() == user => {
                products.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::RowNotFound),
        }
    }

    fn product(&self, user: UserId, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(products.get(&id).filter(|p| p.user_id() == user).cloned())
    }

    fn products(&self, user: UserId) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut rows: Vec<Product> = products
            .values()
            .filter(|p| p.user_id() == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id_typed().0.as_uuid().cmp(a.id_typed().0.as_uuid()))
        });
        Ok(rows)
    }

    fn product_by_sku(&self, user: UserId, sku: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(products
            .values()
            .find(|p| p.user_id() == user && p.sku() == sku)
            .cloned())
    }
}

impl InvoiceStore for InMemoryStore {
    fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        let mut invoices = self.invoices.write().map_err(|_| StoreError::LockPoisoned)?;
        match invoices.entry(invoice.id_typed()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(invoice.id_typed().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(invoice);
                Ok(())
            }
        }
    }

    fn update_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        let mut invoices = self.invoices.write().map_err(|_| StoreError::LockPoisoned)?;
        match invoices.entry(invoice.id_typed()) {
            Entry::Occupied(mut slot) => {
                slot.insert(invoice);
                Ok(())
            }
            Entry::Vacant(_) => Err(StoreError::RowNotFound),
        }
    }

    fn delete_invoice(&self, user: UserId, id: InvoiceId) -> Result<(), StoreError> {
        let mut invoices = self.invoices.write().map_err(|_| StoreError::LockPoisoned)?;
        match invoices.get(&id) {
            Some(existing) if existing.user_id() == user => {
                // Items live inside the record, so this removes them too.
                invoices.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::RowNotFound),
        }
    }

    fn invoice(&self, user: UserId, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let invoices = self.invoices.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(invoices.get(&id).filter(|i| i.user_id() == user).cloned())
    }

    fn invoices(&self, user: UserId) -> Result<Vec<Invoice>, StoreError> {
        let invoices = self.invoices.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut rows: Vec<Invoice> = invoices
            .values()
            .filter(|i| i.user_id() == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id_typed().0.as_uuid().cmp(a.id_typed().0.as_uuid()))
        });
        Ok(rows)
    }

    fn invoice_count_for_customer(&self, customer: CustomerId) -> Result<usize, StoreError> {
        let invoices = self.invoices.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(invoices
            .values()
            .filter(|i| i.customer_id() == customer)
            .count())
    }

    fn next_invoice_sequence(&self, user: UserId) -> Result<u64, StoreError> {
        let mut sequences = self.sequences.write().map_err(|_| StoreError::LockPoisoned)?;
        let next = sequences.entry(user).or_insert(0);
        *next += 1;
        Ok(*next)
    }
}
