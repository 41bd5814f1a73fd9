//! Customers domain module.
//!
//! This crate contains business rules for customer records, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage). Per-user email
//! uniqueness and the delete guard need store-wide sight and live in the
//! service layer.

pub mod customer;

pub use customer::{ContactDetails, Customer, CustomerDraft, CustomerId};
