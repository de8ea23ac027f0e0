use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

/// Decimal places a price may carry; matches the `NUMERIC(19, 2)` column.
pub const PRICE_SCALE: u32 = 2;

/// Caller-supplied product fields (everything except the store-assigned id).
///
/// Used both for creation and for whole-record replacement on update: every
/// field overwrites the stored value, including `description` and `sku`
/// when they are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub sku: Option<String>,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            quantity,
            sku: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Check field invariants and normalize the input.
    ///
    /// A blank SKU is treated as absent so it never takes part in uniqueness checks.
    pub fn validate(mut self) -> DomainResult<Self> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be blank"));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::validation("price must not be negative"));
        }
        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(DomainError::validation(format!(
                "price must have at most {PRICE_SCALE} decimal places"
            )));
        }
        self.sku = self
            .sku
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(self)
    }
}

/// A persisted product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub sku: Option<String>,
}

impl Product {
    /// Build a record under `id` from a full field set.
    pub fn from_input(id: ProductId, input: ProductInput) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            sku: input.sku,
        }
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn has_stock(&self, required: u32) -> bool {
        self.quantity >= required
    }

    /// Returns a copy with `amount` units removed, or `None` if that would
    /// take the quantity below zero.
    pub fn with_stock_decreased(&self, amount: u32) -> Option<Self> {
        let quantity = self.quantity.checked_sub(amount)?;
        Some(Self {
            quantity,
            ..self.clone()
        })
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
