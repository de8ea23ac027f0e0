use rust_decimal::Decimal;
use serde::Deserialize;

use catalog_core::{DomainError, DomainResult};
use catalog_products::ProductInput;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// Required fields are optional here so that a missing field is reported as
/// a validation error rather than a deserialization failure. Any `id` in the
/// body is ignored.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
}

impl ProductRequest {
    pub fn into_input(self) -> DomainResult<ProductInput> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DomainError::validation("name is required")),
        };
        let price = self
            .price
            .ok_or_else(|| DomainError::validation("price is required"))?;
        let quantity = self
            .quantity
            .ok_or_else(|| DomainError::validation("quantity is required"))?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| DomainError::validation("quantity must be between 0 and 4294967295"))?;

        ProductInput {
            name,
            description: self.description,
            price,
            quantity,
            sku: self.sku,
        }
        .validate()
    }
}

/// Query string of the stock endpoints: `?quantity=N`.
#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProductRequest {
        ProductRequest {
            name: Some("Laptop".to_string()),
            description: None,
            price: Some(Decimal::new(120000, 2)),
            quantity: Some(50),
            sku: Some("LAP-001".to_string()),
        }
    }

    #[test]
    fn complete_request_maps_to_input() {
        let input = request().into_input().unwrap();
        assert_eq!(input.name, "Laptop");
        assert_eq!(input.quantity, 50);
        assert_eq!(input.sku.as_deref(), Some("LAP-001"));
    }

    #[test]
    fn missing_required_fields_are_validation_errors() {
        for req in [
            ProductRequest { name: None, ..request() },
            ProductRequest { name: Some("  ".to_string()), ..request() },
            ProductRequest { price: None, ..request() },
            ProductRequest { quantity: None, ..request() },
            ProductRequest { quantity: Some(-1), ..request() },
        ] {
            assert!(matches!(req.into_input(), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn body_id_is_ignored() {
        let req: ProductRequest = serde_json::from_value(serde_json::json!({
            "id": 99,
            "name": "Laptop",
            "price": "1200.00",
            "quantity": 1
        }))
        .unwrap();
        let input = req.into_input().unwrap();
        assert_eq!(input.price.to_string(), "1200.00");
    }
}
