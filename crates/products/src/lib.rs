//! Product catalog domain.
//!
//! The record type and its field rules (`product`), the storage port the
//! service runs against (`store`), and the use cases themselves (`service`).
//! Storage adapters live in `catalog-infra`.

pub mod locks;
pub mod product;
pub mod service;
pub mod store;

pub use locks::RecordLocks;
pub use product::{PRICE_SCALE, Product, ProductInput};
pub use service::{ProductService, ServiceError, ServiceResult, StockDecrease};
pub use store::{ProductStore, StoreError};
