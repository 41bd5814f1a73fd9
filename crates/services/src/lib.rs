//! `ledgerly-services` — application services over the storage seam.
//!
//! Route handlers call these services; the services enforce per-user scoping,
//! uniqueness and referential-integrity guards, invoice numbering, and the
//! email flow that gates the `SENT` transition on confirmed delivery. All
//! persistent state lives behind the store traits; `InMemoryStore` backs
//! tests and development.

pub mod customers;
pub mod email_flow;
pub mod invoices;
pub mod memory;
pub mod products;
pub mod store;
pub mod telemetry;

pub use customers::CustomerService;
pub use email_flow::InvoiceEmailService;
pub use invoices::{CreateInvoice, InvoiceService};
pub use memory::InMemoryStore;
pub use products::ProductService;
pub use store::{CustomerStore, InvoiceStore, ProductStore, StoreError};
