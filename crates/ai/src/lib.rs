//! `ledgerly-ai`
//!
//! **Responsibility:** the AI email-drafting boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on domain entities (Customer/Invoice/etc); callers
//!   hand it plain snapshots.
//! - It must not mutate domain state.
//! - Its output is a reviewed-before-send draft, not a committed email.
//!
//! Model output is an untrusted external payload: known markdown code-fence
//! wrapping is stripped, then the content must parse as strict JSON or the
//! whole generation fails with a typed error. There is no silent fallback to
//! empty content.

pub mod context;
pub mod draft;
pub mod provider;

pub use context::{EmailContext, LineSummary};
pub use draft::{EmailDraft, parse_draft};
pub use provider::{
    AiError, DraftProvider, MockProvider, OpenAiConfig, OpenAiProvider, generate_email_draft,
};
