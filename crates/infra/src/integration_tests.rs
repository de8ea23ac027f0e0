//! Integration tests for the product service over the in-memory store.
//!
//! Tests: Service → ProductStore → records
//!
//! Verifies:
//! - ids are assigned once and stay stable
//! - SKU uniqueness on create and update
//! - whole-record replacement on update
//! - stock checks and decreases, including concurrent decreases on one record

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use catalog_core::{DomainError, ProductId};
    use catalog_products::{
        ProductInput, ProductService, ProductStore, ServiceError, StockDecrease, StoreError,
    };

    use crate::store::InMemoryProductStore;

    fn service() -> ProductService<Arc<InMemoryProductStore>> {
        ProductService::new(Arc::new(InMemoryProductStore::new()))
    }

    fn laptop() -> ProductInput {
        ProductInput::new("Laptop", Decimal::new(120000, 2), 50).with_sku("LAP-001")
    }

    #[tokio::test]
    async fn laptop_lifecycle() {
        let svc = service();

        let created = svc.create_product(laptop()).await.unwrap();
        assert_eq!(created.id, ProductId::FIRST);
        assert_eq!(created.name, "Laptop");
        assert_eq!(created.price, Decimal::new(120000, 2));
        assert_eq!(created.quantity, 50);
        assert_eq!(created.sku.as_deref(), Some("LAP-001"));

        assert!(svc.check_stock(created.id, 10).await.unwrap());

        let decreased = svc.decrease_stock(created.id, 10).await.unwrap();
        match decreased {
            StockDecrease::Decreased(p) => assert_eq!(p.quantity, 40),
            other => panic!("expected decrease, got {other:?}"),
        }

        let refused = svc.decrease_stock(created.id, 1000).await.unwrap();
        assert_eq!(
            refused,
            StockDecrease::InsufficientStock {
                available: 40,
                requested: 1000
            }
        );
        assert_eq!(svc.get_product(created.id).await.unwrap().unwrap().quantity, 40);

        assert!(svc.delete_product(created.id).await.unwrap());
        assert!(svc.get_product(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn created_ids_are_unique_and_stable() {
        let svc = service();
        let mut ids = Vec::new();
        for i in 0..5 {
            let p = svc
                .create_product(ProductInput::new(format!("P{i}"), Decimal::ONE, 1))
                .await
                .unwrap();
            ids.push(p.id);
        }
        let distinct: HashSet<ProductId> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), 5);

        for id in ids {
            assert_eq!(svc.get_product(id).await.unwrap().unwrap().id, id);
        }
    }

    #[tokio::test]
    async fn caller_cannot_choose_the_id() {
        let svc = service();
        svc.create_product(laptop()).await.unwrap();
        let second = svc
            .create_product(ProductInput::new("Mouse", Decimal::new(2500, 2), 3))
            .await
            .unwrap();
        assert_eq!(second.id, ProductId::new(2));
    }

    #[tokio::test]
    async fn find_by_sku_and_duplicate_sku() {
        let svc = service();
        let created = svc.create_product(laptop()).await.unwrap();

        assert_eq!(svc.get_product_by_sku("LAP-001").await.unwrap(), Some(created));
        assert!(svc.get_product_by_sku("NOPE").await.unwrap().is_none());

        let err = svc.create_product(laptop()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::ConstraintViolation(_))));
        assert_eq!(svc.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let svc = service();
        let err = svc
            .create_product(ProductInput::new(" ", Decimal::ONE, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert!(svc.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_every_field_and_keeps_id() {
        let svc = service();
        let created = svc
            .create_product(laptop().with_description("14 inch"))
            .await
            .unwrap();

        // No description, no sku: both are cleared, not kept.
        let replacement = ProductInput::new("Laptop Pro", Decimal::new(150000, 2), 7);
        let updated = svc
            .update_product(created.id, replacement)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Laptop Pro");
        assert_eq!(updated.description, None);
        assert_eq!(updated.price, Decimal::new(150000, 2));
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.sku, None);
        assert_eq!(svc.get_product(created.id).await.unwrap(), Some(updated));
        assert!(svc.get_product_by_sku("LAP-001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_id_is_absent_and_writes_nothing() {
        let svc = service();
        let created = svc.create_product(laptop()).await.unwrap();

        let result = svc
            .update_product(ProductId::new(42), ProductInput::new("Ghost", Decimal::ONE, 1))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(svc.list_products().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn update_to_taken_sku_is_a_constraint_violation() {
        let svc = service();
        svc.create_product(laptop()).await.unwrap();
        let mouse = svc
            .create_product(ProductInput::new("Mouse", Decimal::ONE, 1).with_sku("MOU-001"))
            .await
            .unwrap();

        let err = svc
            .update_product(mouse.id, ProductInput::new("Mouse", Decimal::ONE, 1).with_sku("LAP-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::ConstraintViolation(_))));
        assert_eq!(svc.get_product(mouse.id).await.unwrap(), Some(mouse));
    }

    #[tokio::test]
    async fn delete_twice_reports_true_then_false() {
        let svc = service();
        let created = svc.create_product(laptop()).await.unwrap();
        assert!(svc.delete_product(created.id).await.unwrap());
        assert!(!svc.delete_product(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn stock_operations_on_missing_product() {
        let svc = service();
        assert!(!svc.check_stock(ProductId::new(9), 0).await.unwrap());
        assert_eq!(
            svc.decrease_stock(ProductId::new(9), 1).await.unwrap(),
            StockDecrease::NotFound
        );
    }

    #[tokio::test]
    async fn decrease_to_exactly_zero_is_allowed() {
        let svc = service();
        let created = svc.create_product(laptop()).await.unwrap();
        let result = svc.decrease_stock(created.id, 50).await.unwrap();
        assert_eq!(result.into_product().unwrap().quantity, 0);
        assert!(svc.check_stock(created.id, 0).await.unwrap());
        assert!(!svc.check_stock(created.id, 1).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_decreases_never_oversell() {
        let svc = Arc::new(service());
        let created = svc
            .create_product(ProductInput::new("Widget", Decimal::ONE, 25))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..40 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.decrease_stock(created.id, 1).await.unwrap()
            }));
        }

        let mut decreased = 0;
        let mut refused = 0;
        for h in handles {
            match h.await.unwrap() {
                StockDecrease::Decreased(_) => decreased += 1,
                StockDecrease::InsufficientStock { .. } => refused += 1,
                StockDecrease::NotFound => panic!("record vanished"),
            }
        }

        assert_eq!(decreased, 25);
        assert_eq!(refused, 15);
        assert_eq!(svc.store().find_by_id(created.id).await.unwrap().unwrap().quantity, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn decrease_stock_matches_arithmetic(q in 0u32..500, n in 0u32..1000) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let svc = service();
                let created = svc
                    .create_product(ProductInput::new("P", Decimal::ONE, q))
                    .await
                    .unwrap();

                prop_assert_eq!(svc.check_stock(created.id, n).await.unwrap(), n <= q);

                let outcome = svc.decrease_stock(created.id, n).await.unwrap();
                let stored = svc.get_product(created.id).await.unwrap().unwrap().quantity;
                if n <= q {
                    prop_assert_eq!(outcome.into_product().map(|p| p.quantity), Some(q - n));
                    prop_assert_eq!(stored, q - n);
                } else {
                    prop_assert!(outcome.into_product().is_none());
                    prop_assert_eq!(stored, q);
                }
                Ok(())
            })?;
        }
    }
}
