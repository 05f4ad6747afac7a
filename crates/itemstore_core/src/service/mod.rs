//! Item use-case services.
//!
//! # Responsibility
//! - Expose the item operations to callers without leaking storage details.
//! - Keep CLI and other entry points decoupled from the active backend.
//!
//! # Invariants
//! - Services add no business rule on top of the repository contract.

pub mod item_service;
pub mod split_service;

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::RepoResult;

/// Object-safe use-case surface shared by every item service flavour.
pub trait ItemUseCase {
    fn save(&self, item: &NewItem) -> RepoResult<Item>;
    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()>;
    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn find_items(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>>;
}
