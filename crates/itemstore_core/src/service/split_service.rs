//! Item service with separate command and query components.
//!
//! # Responsibility
//! - Route save/update/lookup to a CRUD repository.
//! - Route filtered searches to a dedicated query component.
//!
//! # Invariants
//! - Both components must observe the same storage, otherwise searches
//!   would miss items written through the command side.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{ItemQueryRepository, ItemRepository, RepoResult};
use crate::service::ItemUseCase;

/// Service whose searches go through a query component instead of the CRUD
/// repository's own `find_all`.
pub struct SplitItemService<R: ItemRepository, Q: ItemQueryRepository> {
    repo: R,
    query: Q,
}

impl<R: ItemRepository, Q: ItemQueryRepository> SplitItemService<R, Q> {
    pub fn new(repo: R, query: Q) -> Self {
        Self { repo, query }
    }
}

impl<R: ItemRepository, Q: ItemQueryRepository> ItemUseCase for SplitItemService<R, Q> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        self.repo.save(item)
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        self.repo.update(id, params)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.find_by_id(id)
    }

    fn find_items(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        self.query.find_all(cond)
    }
}

#[cfg(test)]
mod tests {
    use super::SplitItemService;
    use crate::model::item::{Item, ItemSearchCond, NewItem};
    use crate::repo::memory_repo::MemoryItemRepository;
    use crate::repo::{ItemQueryRepository, RepoResult};
    use crate::service::ItemUseCase;
    use std::cell::Cell;

    struct CountingQuery<'a> {
        inner: &'a MemoryItemRepository,
        calls: Cell<usize>,
    }

    impl ItemQueryRepository for CountingQuery<'_> {
        fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
            self.calls.set(self.calls.get() + 1);
            crate::repo::ItemRepository::find_all(self.inner, cond)
        }
    }

    #[test]
    fn searches_go_through_query_component() {
        let repo = MemoryItemRepository::new();
        let query = CountingQuery {
            inner: &repo,
            calls: Cell::new(0),
        };
        let service = SplitItemService::new(&repo, query);

        let saved = service.save(&NewItem::new("itemA", 10_000, 10)).unwrap();
        assert_eq!(service.find_by_id(saved.id).unwrap(), Some(saved.clone()));

        let found = service
            .find_items(&ItemSearchCond::new(Some("itemA"), None))
            .unwrap();
        assert_eq!(found, vec![saved]);
        assert_eq!(service.query.calls.get(), 1);
    }
}
