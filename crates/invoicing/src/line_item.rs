//! Line-item builder: one priced row within an invoice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult, EntityId, Money};
use ledgerly_products::{Product, ProductId};

/// Invoice-item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceItemId(pub EntityId);

impl InvoiceItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Caller-supplied input for one invoice line.
///
/// When `product_id` is set, `description` and `unit_price` default from the
/// referenced product unless overridden here; when absent, both are required
/// (a free-text line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDraft {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

/// Priced line within an invoice.
///
/// `line_total` is derived at build time and immutable thereafter; editing a
/// line means rebuilding it from a fresh draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    id: InvoiceItemId,
    product_id: Option<ProductId>,
    description: String,
    quantity: u32,
    unit_price: Money,
    line_total: Money,
}

impl InvoiceItem {
    /// Build a priced line from a draft plus the resolved product snapshot, if
    /// the draft references one.
    ///
    /// Pure over its inputs; the product lookup happens in the service layer.
    pub fn build(
        id: InvoiceItemId,
        draft: &LineItemDraft,
        product: Option<&Product>,
    ) -> DomainResult<Self> {
        if let (Some(draft_product), Some(resolved)) = (draft.product_id, product) {
            if resolved.id_typed() != draft_product {
                return Err(DomainError::invariant(
                    "resolved product does not match the draft's product reference",
                ));
            }
        }
        if draft.product_id.is_some() && product.is_none() {
            return Err(DomainError::not_found());
        }

        let description = match &draft.description {
            Some(description) => {
                let trimmed = description.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation("description", "must not be empty"));
                }
                trimmed.to_string()
            }
            None => match product {
                Some(product) => product.name().to_string(),
                None => return Err(DomainError::validation("description", "is required")),
            },
        };

        if draft.quantity < 1 {
            return Err(DomainError::validation("quantity", "must be at least 1"));
        }

        let unit_price = match draft.unit_price {
            Some(price) => {
                if price < Decimal::ZERO {
                    return Err(DomainError::validation("unit_price", "must not be negative"));
                }
                Money::new(price)?
            }
            None => match product {
                Some(product) => product.unit_price(),
                None => return Err(DomainError::validation("unit_price", "is required")),
            },
        };

        let line_total = unit_price.times(draft.quantity)?;

        Ok(Self {
            id,
            product_id: draft.product_id,
            description,
            quantity: draft.quantity,
            unit_price,
            line_total,
        })
    }

    pub fn id_typed(&self) -> InvoiceItemId {
        self.id
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }
}
