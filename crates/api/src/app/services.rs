use std::sync::Arc;

use catalog_infra::{InMemoryProductStore, PostgresProductStore, StoreConfig};
use catalog_products::{ProductService, ProductStore, StoreError};

/// Product service over whichever store the process was configured with.
pub type CatalogService = ProductService<Arc<dyn ProductStore>>;

/// Shared application state handed to every handler.
pub struct AppServices {
    pub products: CatalogService,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            products: ProductService::new(store),
        }
    }
}

pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    match config {
        StoreConfig::InMemory => {
            tracing::warn!("DATABASE_URL not set; using in-memory product store");
            Ok(Arc::new(InMemoryProductStore::new()))
        }
        StoreConfig::Postgres {
            url,
            max_connections,
        } => {
            let store = PostgresProductStore::connect(url, *max_connections).await?;
            store.ensure_schema().await?;
            tracing::info!(max_connections, "using postgres product store");
            Ok(Arc::new(store))
        }
    }
}
