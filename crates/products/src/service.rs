//! Product use cases over an injected [`ProductStore`].
//!
//! Reads pass straight through to the store. Writes that depend on the current
//! record (`update_product`, `delete_product`, `decrease_stock`) hold that
//! record's lock from the read until the write lands, so concurrent callers on
//! the same id observe each other's effects in order.

use thiserror::Error;
use tracing::instrument;

use catalog_core::{DomainError, ProductId};

use crate::locks::RecordLocks;
use crate::product::{Product, ProductInput};
use crate::store::{ProductStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome of [`ProductService::decrease_stock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockDecrease {
    Decreased(Product),
    NotFound,
    InsufficientStock { available: u32, requested: u32 },
}

impl StockDecrease {
    /// Collapse to "updated product or nothing", treating a missing record and
    /// insufficient stock alike.
    pub fn into_product(self) -> Option<Product> {
        match self {
            StockDecrease::Decreased(p) => Some(p),
            StockDecrease::NotFound | StockDecrease::InsufficientStock { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct ProductService<S> {
    store: S,
    locks: RecordLocks,
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: RecordLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_product(&self, id: ProductId) -> ServiceResult<Option<Product>> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn get_product_by_sku(&self, sku: &str) -> ServiceResult<Option<Product>> {
        Ok(self.store.find_by_sku(sku).await?)
    }

    #[instrument(skip(self, input), fields(sku = ?input.sku), err)]
    pub async fn create_product(&self, input: ProductInput) -> ServiceResult<Product> {
        let input = input.validate()?;
        let product = self.store.insert(input).await?;
        tracing::info!(product_id = %product.id, quantity = product.quantity, "product created");
        Ok(product)
    }

    /// Replace every field of the record at `id` with `input`.
    ///
    /// Returns `Ok(None)` if there is no such record; nothing is written then.
    #[instrument(skip(self, input), fields(product_id = %id), err)]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> ServiceResult<Option<Product>> {
        let input = input.validate()?;
        let _guard = self.locks.lock(id).await;

        if self.store.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let merged = Product::from_input(id, input);
        let updated = match self.store.update(&merged).await {
            Ok(p) => p,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(sku = ?updated.sku, quantity = updated.quantity, "product updated");
        Ok(Some(updated))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> ServiceResult<bool> {
        let _guard = self.locks.lock(id).await;
        let removed = self.store.delete(id).await?;
        if removed {
            tracing::info!("product deleted");
        }
        Ok(removed)
    }

    /// `true` iff the product exists and holds at least `required` units.
    pub async fn check_stock(&self, id: ProductId, required: u32) -> ServiceResult<bool> {
        Ok(self
            .store
            .find_by_id(id)
            .await?
            .is_some_and(|p| p.has_stock(required)))
    }

    /// Remove `amount` units from the product's stock, never going below zero.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn decrease_stock(&self, id: ProductId, amount: u32) -> ServiceResult<StockDecrease> {
        let _guard = self.locks.lock(id).await;

        let Some(current) = self.store.find_by_id(id).await? else {
            return Ok(StockDecrease::NotFound);
        };

        let Some(next) = current.with_stock_decreased(amount) else {
            tracing::debug!(
                available = current.quantity,
                requested = amount,
                "insufficient stock"
            );
            return Ok(StockDecrease::InsufficientStock {
                available: current.quantity,
                requested: amount,
            });
        };

        let updated = match self.store.update(&next).await {
            Ok(p) => p,
            Err(StoreError::NotFound(_)) => return Ok(StockDecrease::NotFound),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            from = current.quantity,
            to = updated.quantity,
            "stock decreased"
        );
        Ok(StockDecrease::Decreased(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(quantity: u32) -> Product {
        Product::from_input(
            ProductId::FIRST,
            ProductInput::new("Laptop", Decimal::new(120000, 2), quantity),
        )
    }

    #[test]
    fn into_product_conflates_missing_and_insufficient() {
        assert_eq!(StockDecrease::Decreased(product(3)).into_product(), Some(product(3)));
        assert_eq!(StockDecrease::NotFound.into_product(), None);
        assert_eq!(
            StockDecrease::InsufficientStock { available: 1, requested: 2 }.into_product(),
            None
        );
    }

    #[test]
    fn errors_are_transparent() {
        let err: ServiceError = DomainError::validation("name must not be blank").into();
        assert_eq!(err.to_string(), "validation failed: name must not be blank");

        let err: ServiceError = StoreError::duplicate_sku("LAP-001").into();
        assert_eq!(err.to_string(), "constraint violation: sku 'LAP-001' is already in use");
    }
}
