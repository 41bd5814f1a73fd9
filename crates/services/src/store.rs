//! Storage seam: user-scoped persistence traits.
//!
//! Implementations are expected to be thread-safe and to make each trait
//! method atomic. Multi-row writes (an invoice plus its items) are a single
//! insert of one record here, so all-or-nothing comes for free; a relational
//! implementation must wrap them in one transaction.

use thiserror::Error;

use ledgerly_core::{DomainError, UserId};
use ledgerly_customers::{Customer, CustomerId};
use ledgerly_invoicing::{Invoice, InvoiceId};
use ledgerly_products::{Product, ProductId};

/// Storage-level failure, mapped to the domain taxonomy at the service layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("row not found")]
    RowNotFound,
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LockPoisoned => DomainError::upstream("store", "storage lock poisoned"),
            StoreError::DuplicateKey(key) => DomainError::conflict(format!("duplicate key: {key}")),
            StoreError::RowNotFound => DomainError::not_found(),
        }
    }
}

/// Customer rows, scoped to the owning user.
pub trait CustomerStore: Send + Sync {
    fn insert_customer(&self, customer: Customer) -> Result<(), StoreError>;

    /// Replace an existing row by id.
    fn update_customer(&self, customer: Customer) -> Result<(), StoreError>;

    fn delete_customer(&self, user: UserId, id: CustomerId) -> Result<(), StoreError>;

    /// A row owned by a different user reads as absent.
    fn customer(&self, user: UserId, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// All of the user's customers, newest first.
    fn customers(&self, user: UserId) -> Result<Vec<Customer>, StoreError>;

    fn customer_by_email(
        &self,
        user: UserId,
        email: &str,
    ) -> Result<Option<Customer>, StoreError>;
}

/// Product rows, scoped to the owning user.
pub trait ProductStore: Send + Sync {
    fn insert_product(&self, product: Product) -> Result<(), StoreError>;

    fn update_product(&self, product: Product) -> Result<(), StoreError>;

    fn delete_product(&self, user: UserId, id: ProductId) -> Result<(), StoreError>;

    fn product(&self, user: UserId, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// All of the user's products, newest first.
    fn products(&self, user: UserId) -> Result<Vec<Product>, StoreError>;

    fn product_by_sku(&self, user: UserId, sku: &str) -> Result<Option<Product>, StoreError>;
}

/// Invoice rows (items travel inside the record), scoped to the owning user.
pub trait InvoiceStore: Send + Sync {
    /// Insert the invoice with its full item set. All-or-nothing.
    fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError>;

    fn update_invoice(&self, invoice: Invoice) -> Result<(), StoreError>;

    /// Delete the invoice and, with it, all of its items.
    fn delete_invoice(&self, user: UserId, id: InvoiceId) -> Result<(), StoreError>;

    fn invoice(&self, user: UserId, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// All of the user's invoices, newest first.
    fn invoices(&self, user: UserId) -> Result<Vec<Invoice>, StoreError>;

    /// How many invoices reference the customer (the delete guard's count).
    fn invoice_count_for_customer(&self, customer: CustomerId) -> Result<usize, StoreError>;

    /// Atomically advance and return the user's invoice sequence (1-based).
    ///
    /// This replaces deriving numbers from a row count, which races under
    /// concurrent creation: two creators must never observe the same value.
    /// A burned value (creation failed after allocation) leaves a gap, which
    /// is acceptable; a duplicate is not.
    fn next_invoice_sequence(&self, user: UserId) -> Result<u64, StoreError>;
}
