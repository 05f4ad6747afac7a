//! Item use-case service over a single repository.
//!
//! # Responsibility
//! - Provide stable CRUD/search entry points for core callers.
//! - Delegate persistence to exactly one repository implementation.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{ItemRepository, RepoResult};
use crate::service::ItemUseCase;

/// Use-case service wrapper for item operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Saves a new item and returns it with its assigned id.
    pub fn save(&self, item: &NewItem) -> RepoResult<Item> {
        self.repo.save(item)
    }

    /// Replaces name, price and quantity of an existing item.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        self.repo.update(id, params)
    }

    pub fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.find_by_id(id)
    }

    /// Lists items matching the optional name/price filters.
    pub fn find_items(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        self.repo.find_all(cond)
    }
}

impl<R: ItemRepository> ItemUseCase for ItemService<R> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        ItemService::save(self, item)
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        ItemService::update(self, id, params)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        ItemService::find_by_id(self, id)
    }

    fn find_items(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        ItemService::find_items(self, cond)
    }
}
