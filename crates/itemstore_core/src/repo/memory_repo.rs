//! In-memory item repository.
//!
//! # Responsibility
//! - Provide a storage-free backend for development and tests.
//!
//! # Invariants
//! - The store is owned by the repository value; there is no global state.
//! - Map and id sequence are mutated under one lock, so ids stay unique
//!   under concurrent `save` calls.
//! - Ids come from a monotonic sequence and are never reused, not even
//!   after `clear_store`.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{ItemRepository, RepoError, RepoResult};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryStore {
    items: BTreeMap<ItemId, Item>,
    sequence: ItemId,
}

/// Mutex-guarded, process-local item repository.
#[derive(Debug, Default)]
pub struct MemoryItemRepository {
    store: Mutex<MemoryStore>,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every stored item. Intended for test isolation only.
    pub fn clear_store(&self) -> RepoResult<()> {
        let mut store = self.lock()?;
        store.items.clear();
        Ok(())
    }

    /// Number of stored items.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.lock()?.items.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.lock()?.items.is_empty())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryStore>> {
        self.store.lock().map_err(|_| RepoError::StoreUnavailable)
    }
}

impl ItemRepository for MemoryItemRepository {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        let mut store = self.lock()?;
        store.sequence += 1;
        let saved = Item::from_new(store.sequence, item);
        store.items.insert(saved.id, saved.clone());

        debug!(
            "event=item_save module=repo backend=memory status=ok item_id={}",
            saved.id
        );
        Ok(saved)
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        let mut store = self.lock()?;
        let item = store.items.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        item.apply_update(params);
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let store = self.lock()?;
        // BTreeMap iteration is ascending id, i.e. insertion order.
        Ok(store
            .items
            .values()
            .filter(|item| cond.matches(item))
            .cloned()
            .collect())
    }
}
