//! Invoice status lifecycle and the transition gate.

use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult};

/// Invoice status lifecycle: `Draft -> Sent -> {Paid, Overdue}`.
///
/// `Paid` and `Overdue` are terminal and reachable only from `Sent`; `Overdue`
/// is set explicitly by a caller (a user action or an external scheduler),
/// never computed here. The transition to `Sent` may only be performed after
/// the mail transport confirms delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Overdue)
    }

    /// Validate a transition without performing it.
    ///
    /// The gate is strict and one-directional: skips, self-transitions, and
    /// anything out of a terminal state are rejected.
    pub fn check_transition(self, to: InvoiceStatus) -> DomainResult<()> {
        use InvoiceStatus::*;
        match (self, to) {
            (Draft, Sent) | (Sent, Paid) | (Sent, Overdue) => Ok(()),
            _ => Err(DomainError::invalid_transition(format!(
                "{self} -> {to} is not allowed"
            ))),
        }
    }

    /// Parse a wire-format status value (`DRAFT`, `SENT`, `PAID`, `OVERDUE`).
    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "DRAFT" => Ok(InvoiceStatus::Draft),
            "SENT" => Ok(InvoiceStatus::Sent),
            "PAID" => Ok(InvoiceStatus::Paid),
            "OVERDUE" => Ok(InvoiceStatus::Overdue),
            other => Err(DomainError::invalid_transition(format!(
                "unrecognized status '{other}'"
            ))),
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
        };
        f.write_str(s)
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
