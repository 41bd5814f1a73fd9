//! Invoicing domain module.
//!
//! This crate contains the business rules for invoices: the line-item builder,
//! totals aggregation, sequential numbering, and the status transition gate.
//! All of it is deterministic domain logic (no IO, no HTTP, no storage); the
//! per-user invoice sequence itself is owned by the store and handed in as a
//! plain integer.

pub mod invoice;
pub mod line_item;
pub mod number;
pub mod status;

pub use invoice::{Invoice, InvoiceId, parse_due_date};
pub use line_item::{InvoiceItem, InvoiceItemId, LineItemDraft};
pub use number::InvoiceNumber;
pub use status::InvoiceStatus;
