//! Per-record mutual exclusion for read-check-write sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use catalog_core::ProductId;

/// Lock table keyed by product id.
///
/// Holding the guard for an id serializes all guarded operations on that
/// record; different ids never contend. Entries are created on demand and
/// dropped again once no guard or waiter references them.
#[derive(Debug, Default)]
pub struct RecordLocks {
    inner: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
}

/// Guard for one record. Releases the lock (and prunes the entry) on drop.
#[derive(Debug)]
pub struct RecordGuard<'a> {
    id: ProductId,
    locks: &'a RecordLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, id: ProductId) -> RecordGuard<'_> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(id).or_default().clone()
        };
        // Unarmed until acquired, so a cancelled wait still prunes the entry.
        let mut pending = RecordGuard {
            id,
            locks: self,
            guard: None,
        };
        pending.guard = Some(slot.lock_owned().await);
        pending
    }

    /// Number of ids currently holding a table entry.
    pub fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn release(&self, id: ProductId) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Only the table itself still holds the slot: nobody is waiting.
        if map.get(&id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            map.remove(&id);
        }
    }
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(self.id);
    }
}
