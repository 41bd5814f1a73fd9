//! Exact decimal money arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ValueObject;
use crate::error::{DomainError, DomainResult};

/// A non-negative monetary amount.
///
/// Backed by a fixed-precision decimal, never binary floating point, so
/// `3 * 19.99` is exactly `59.97` and addition is commutative and associative:
/// summation order can never change a total.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Construct from a decimal amount; negative amounts are rejected.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::validation("amount", "must not be negative"));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by an item quantity; overflow is an invariant error, not a wrap.
    pub fn times(self, quantity: u32) -> DomainResult<Money> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money multiplication overflow"))
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money addition overflow"))
    }

    /// Sum an iterator of amounts with checked addition.
    pub fn sum<I>(amounts: I) -> DomainResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Cent precision: round first (scale can exceed 2), then pad (it can be less).
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}
