//! Product CRUD with per-user scoping and SKU uniqueness.

use std::sync::Arc;

use chrono::Utc;

use ledgerly_core::{DomainError, DomainResult, EntityId, UserId};
use ledgerly_products::{Product, ProductDraft, ProductId};

use crate::store::ProductStore;

pub struct ProductService<S> {
    store: Arc<S>,
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, user: UserId, draft: ProductDraft) -> DomainResult<Product> {
        let id = ProductId::new(EntityId::new());
        let product = Product::create(id, user, draft, Utc::now())?;

        if self.store.product_by_sku(user, product.sku())?.is_some() {
            return Err(DomainError::conflict(
                "a product with this SKU already exists",
            ));
        }

        self.store.insert_product(product.clone())?;
        tracing::info!(product = %product.id_typed(), sku = product.sku(), "product created");
        Ok(product)
    }

    pub fn update(
        &self,
        user: UserId,
        id: ProductId,
        draft: ProductDraft,
    ) -> DomainResult<Product> {
        let mut product = self
            .store
            .product(user, id)?
            .ok_or_else(DomainError::not_found)?;
        product.apply(draft, Utc::now())?;

        if let Some(other) = self.store.product_by_sku(user, product.sku())? {
            if other.id_typed() != id {
                return Err(DomainError::conflict(
                    "a product with this SKU already exists",
                ));
            }
        }

        self.store.update_product(product.clone())?;
        Ok(product)
    }

    /// Historical invoice lines keep their description and price, so deleting
    /// a product never touches existing invoices.
    pub fn delete(&self, user: UserId, id: ProductId) -> DomainResult<()> {
        self.store
            .product(user, id)?
            .ok_or_else(DomainError::not_found)?;
        self.store.delete_product(user, id)?;
        Ok(())
    }

    pub fn get(&self, user: UserId, id: ProductId) -> DomainResult<Product> {
        self.store
            .product(user, id)?
            .ok_or_else(DomainError::not_found)
    }

    /// Newest first.
    pub fn list(&self, user: UserId) -> DomainResult<Vec<Product>> {
        Ok(self.store.products(user)?)
    }
}
