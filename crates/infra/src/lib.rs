//! Infrastructure layer: product store adapters and configuration.

pub mod config;
pub mod store;

mod integration_tests;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use store::{InMemoryProductStore, PostgresProductStore};
