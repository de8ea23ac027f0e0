//! Product store port.
//!
//! The store exclusively owns product records. Adapters live in `catalog-infra`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::ProductId;

use crate::product::{Product, ProductInput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write would break SKU uniqueness.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Storage backend failure (connection, query, decoding).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn duplicate_sku(sku: &str) -> Self {
        Self::ConstraintViolation(format!("sku '{sku}' is already in use"))
    }
}

/// Keyed product storage with a SKU uniqueness constraint.
///
/// Every method is a single atomic write or a consistent read; absence is
/// reported as `Ok(None)` / `Ok(false)`, never as an error.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new record under a freshly assigned id.
    async fn insert(&self, input: ProductInput) -> Result<Product, StoreError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// Snapshot of all records, ascending by id.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Replace the record stored under `product.id`.
    async fn update(&self, product: &Product) -> Result<Product, StoreError>;

    /// Remove the record; returns whether one existed.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, input: ProductInput) -> Result<Product, StoreError> {
        (**self).insert(input).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        (**self).find_by_sku(sku).await
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).find_all().await
    }

    async fn update(&self, product: &Product) -> Result<Product, StoreError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
