//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures plus the two upstream
/// seams (AI generation, mail delivery) the route layer needs to tell apart
/// so it can retry or degrade without leaking internal messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation; `field` names the offending input field.
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// A domain invariant was violated (e.g. arithmetic overflow).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found, or is not owned by the requester.
    /// The two cases are deliberately indistinguishable.
    #[error("not found")]
    NotFound,

    /// A uniqueness or referential-integrity conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An illegal invoice status transition, or an unrecognized status value.
    #[error("invalid status transition: {0}")]
    InvalidTransition(String),

    /// An upstream service (AI generation, mail delivery, storage) failed.
    #[error("upstream {service} failure: {message}")]
    Upstream { service: String, message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }
}
