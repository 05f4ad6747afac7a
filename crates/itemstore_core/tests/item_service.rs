use itemstore_core::db::open_db_in_memory;
use itemstore_core::{
    seed_test_data, Backend, BuilderItemRepository, DerivedItemRepository, ItemSearchCond,
    ItemService, ItemStore, ItemUpdateParams, ItemUseCase, MemoryItemRepository, NewItem,
    NamedSqlItemRepository, RepoError, SplitItemService, SqlItemRepository, StoreConfig,
};
use rusqlite::Connection;
use strum::IntoEnumIterator;

#[test]
fn service_passes_operations_through_to_repository() {
    let service = ItemService::new(MemoryItemRepository::new());

    let saved = service.save(&NewItem::new("itemA", 10_000, 10)).unwrap();
    service
        .update(saved.id, &ItemUpdateParams::new("itemA2", 12_000, 12))
        .unwrap();

    let found = service.find_by_id(saved.id).unwrap().unwrap();
    assert_eq!(found.item_name, "itemA2");
    assert_eq!(service.repository().len().unwrap(), 1);
    assert_eq!(
        service.find_items(&ItemSearchCond::default()).unwrap(),
        vec![found]
    );
}

#[test]
fn service_propagates_not_found_unchanged() {
    let service = ItemService::new(MemoryItemRepository::new());
    let err = service
        .update(7, &ItemUpdateParams::new("x", 1, 1))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
}

#[test]
fn split_service_sees_writes_from_command_side() {
    let conn = open_db_in_memory().unwrap();
    let service = SplitItemService::new(
        DerivedItemRepository::try_new(&conn).unwrap(),
        BuilderItemRepository::try_new(&conn).unwrap(),
    );

    let a1 = service.save(&NewItem::new("itemA-1", 10_000, 10)).unwrap();
    service.save(&NewItem::new("itemB-1", 30_000, 30)).unwrap();

    let found = service
        .find_items(&ItemSearchCond::new(Some("itemA"), Some(20_000)))
        .unwrap();
    assert_eq!(found, vec![a1]);
}

#[test]
fn every_backend_opens_and_serves_through_the_store() {
    for backend in Backend::iter() {
        let store = ItemStore::in_memory(backend).unwrap();
        assert_eq!(store.backend(), backend);
        assert_eq!(store.connection().is_some(), backend.uses_sqlite());

        let service = store.service().unwrap();
        let saved = service.save(&NewItem::new("itemC", 5, 1)).unwrap();
        assert_eq!(service.find_by_id(saved.id).unwrap(), Some(saved), "{backend}");
    }
}

#[test]
fn seeding_stores_the_two_sample_items() {
    let mut config = StoreConfig::with_backend(Backend::Split);
    config.seed_data = true;
    let store = ItemStore::open(&config).unwrap();

    let service = store.service().unwrap();
    let items = service.find_items(&ItemSearchCond::default()).unwrap();
    let summary: Vec<_> = items
        .iter()
        .map(|item| (item.item_name.as_str(), item.price, item.quantity))
        .collect();
    assert_eq!(summary, vec![("itemA", 10_000, 10), ("itemB", 20_000, 20)]);
}

#[test]
fn seed_test_data_works_on_any_use_case() {
    let service = ItemService::new(MemoryItemRepository::new());
    let seeded = seed_test_data(&service).unwrap();
    assert_eq!(seeded.len(), 2);
    assert_eq!(service.repository().len().unwrap(), 2);
}

#[test]
fn file_backed_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = StoreConfig::with_backend(Backend::NamedSql);
    config.db_path = Some(dir.path().join("items.db"));

    let saved = {
        let store = ItemStore::open(&config).unwrap();
        let service = store.service().unwrap();
        service.save(&NewItem::new("itemA", 10_000, 10)).unwrap()
    };

    config.backend = Backend::Builder;
    let store = ItemStore::open(&config).unwrap();
    let service = store.service().unwrap();
    assert_eq!(service.find_by_id(saved.id).unwrap(), Some(saved));
}

#[test]
fn sql_backends_reject_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    assert!(matches!(
        SqlItemRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
    assert!(matches!(
        NamedSqlItemRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
    assert!(matches!(
        DerivedItemRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
    assert!(matches!(
        BuilderItemRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
}

#[test]
fn sql_backends_reject_missing_table_and_column() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("ALTER TABLE item RENAME COLUMN quantity TO qty;")
        .unwrap();
    assert!(matches!(
        SqlItemRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "item",
            column: "quantity",
        })
    ));

    conn.execute_batch("DROP TABLE item;").unwrap();
    assert!(matches!(
        DerivedItemRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("item"))
    ));
}
