use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use catalog_core::ProductId;
use catalog_products::{Product, ProductInput, ProductStore, StoreError};

#[derive(Debug)]
struct State {
    records: BTreeMap<ProductId, Product>,
    by_sku: HashMap<String, ProductId>,
    next_id: ProductId,
}

/// In-memory product store for tests/dev.
///
/// A single lock guards records, the SKU index and the id sequence together,
/// so each write is all-or-nothing.
#[derive(Debug)]
pub struct InMemoryProductStore {
    inner: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State {
                records: BTreeMap::new(),
                by_sku: HashMap::new(),
                next_id: ProductId::FIRST,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Fails if `sku` belongs to a record other than `owner`.
    fn check_sku(&self, sku: Option<&str>, owner: Option<ProductId>) -> Result<(), StoreError> {
        let Some(sku) = sku else { return Ok(()) };
        match self.by_sku.get(sku) {
            Some(holder) if Some(*holder) != owner => Err(StoreError::duplicate_sku(sku)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, input: ProductInput) -> Result<Product, StoreError> {
        let mut state = self.write()?;
        state.check_sku(input.sku.as_deref(), None)?;

        let id = state.next_id;
        state.next_id = id.next();

        let product = Product::from_input(id, input);
        if let Some(sku) = &product.sku {
            state.by_sku.insert(sku.clone(), id);
        }
        state.records.insert(id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let state = self.read()?;
        Ok(state
            .by_sku
            .get(sku)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read()?.records.values().cloned().collect())
    }

    async fn update(&self, product: &Product) -> Result<Product, StoreError> {
        let mut state = self.write()?;
        let previous_sku = match state.records.get(&product.id) {
            Some(existing) => existing.sku.clone(),
            None => return Err(StoreError::NotFound(product.id)),
        };
        state.check_sku(product.sku(), Some(product.id))?;

        if let Some(old) = previous_sku {
            state.by_sku.remove(&old);
        }
        if let Some(sku) = &product.sku {
            state.by_sku.insert(sku.clone(), product.id);
        }
        state.records.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.records.remove(&id) {
            Some(removed) => {
                if let Some(sku) = removed.sku {
                    state.by_sku.remove(&sku);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
