use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult, Entity, EntityId, Money, UserId};

/// Product identifier (user-scoped via the entity's `user_id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Schema-validated input for creating or replacing a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub stock_quantity: u32,
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    user_id: UserId,
    sku: String,
    name: String,
    description: Option<String>,
    unit_price: Money,
    stock_quantity: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Validate a draft and create the product record.
    pub fn create(
        id: ProductId,
        user_id: UserId,
        draft: ProductDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (sku, name, description, unit_price) = validate(draft.clone())?;
        Ok(Self {
            id,
            user_id,
            sku,
            name,
            description,
            unit_price,
            stock_quantity: draft.stock_quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the product's details with a new draft.
    pub fn apply(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let stock_quantity = draft.stock_quantity;
        let (sku, name, description, unit_price) = validate(draft)?;
        self.sku = sku;
        self.name = name;
        self.description = description;
        self.unit_price = unit_price;
        self.stock_quantity = stock_quantity;
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate(draft: ProductDraft) -> DomainResult<(String, String, Option<String>, Money)> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }

    let sku = draft.sku.trim();
    if sku.is_empty() {
        return Err(DomainError::validation("sku", "must not be empty"));
    }

    if draft.unit_price < Decimal::ZERO {
        return Err(DomainError::validation("unit_price", "must not be negative"));
    }
    let unit_price = Money::new(draft.unit_price)?;

    let description = draft
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok((sku.to_string(), name.to_string(), description, unit_price))
}
