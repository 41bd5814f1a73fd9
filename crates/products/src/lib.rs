//! Products domain module.
//!
//! This crate contains business rules for the product catalog, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). Per-user
//! SKU uniqueness needs store-wide sight and lives in the service layer.

pub mod product;

pub use product::{Product, ProductDraft, ProductId};
