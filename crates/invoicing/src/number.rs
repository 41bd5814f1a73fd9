//! Human-readable sequential invoice numbers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use ledgerly_core::DomainError;

/// Sequential invoice number, scoped to the owning user.
///
/// Formatted `INV-####`, zero-padded to width 4 (`INV-0001`); the width grows
/// naturally past 9999 (`INV-10000`). Uniqueness per user is guaranteed by the
/// store's atomic sequence, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Format the number for a 1-based sequence value.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("INV-{sequence:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sequence value this number was formatted from.
    pub fn sequence(&self) -> u64 {
        // Constructed only via `from_sequence`/`from_str`, so the suffix is digits.
        self.0
            .trim_start_matches("INV-")
            .parse()
            .unwrap_or_default()
    }
}

impl core::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InvoiceNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("INV-")
            .ok_or_else(|| DomainError::invalid_id(format!("InvoiceNumber: '{s}'")))?;
        let sequence: u64 = digits
            .parse()
            .map_err(|_| DomainError::invalid_id(format!("InvoiceNumber: '{s}'")))?;
        Ok(Self::from_sequence(sequence))
    }
}
