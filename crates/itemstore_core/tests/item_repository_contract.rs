use itemstore_core::{
    Backend, Item, ItemRepository, ItemSearchCond, ItemStore, ItemUpdateParams, NewItem,
    RepoError,
};
use strum::IntoEnumIterator;

fn each_backend(check: impl Fn(Backend, &dyn ItemRepository)) {
    for backend in Backend::iter() {
        let store = ItemStore::in_memory(backend).unwrap();
        let repo = store.repository().unwrap();
        check(backend, &*repo);
    }
}

fn save_scenario(repo: &dyn ItemRepository) -> (Item, Item, Item) {
    let a1 = repo.save(&NewItem::new("itemA-1", 10_000, 10)).unwrap();
    let a2 = repo.save(&NewItem::new("itemA-2", 20_000, 20)).unwrap();
    let b1 = repo.save(&NewItem::new("itemB-1", 30_000, 30)).unwrap();
    (a1, a2, b1)
}

fn search(repo: &dyn ItemRepository, name: Option<&str>, max_price: Option<i64>) -> Vec<Item> {
    repo.find_all(&ItemSearchCond::new(name, max_price)).unwrap()
}

#[test]
fn save_then_find_by_id_returns_equal_item() {
    each_backend(|backend, repo| {
        let saved = repo.save(&NewItem::new("itemA", 10_000, 10)).unwrap();
        assert!(saved.id > 0, "{backend}: id must be positive");
        assert_eq!(saved.item_name, "itemA");

        let found = repo.find_by_id(saved.id).unwrap();
        assert_eq!(found, Some(saved), "{backend}");
    });
}

#[test]
fn saved_ids_are_distinct_and_ascending() {
    each_backend(|backend, repo| {
        let (a1, a2, b1) = save_scenario(repo);
        assert!(a1.id < a2.id && a2.id < b1.id, "{backend}");
    });
}

#[test]
fn update_overwrites_fields_and_keeps_id() {
    each_backend(|backend, repo| {
        let saved = repo.save(&NewItem::new("item1", 10_000, 10)).unwrap();
        repo.update(saved.id, &ItemUpdateParams::new("item2", 20_000, 30))
            .unwrap();

        let found = repo.find_by_id(saved.id).unwrap().unwrap();
        assert_eq!(found.id, saved.id, "{backend}");
        assert_eq!(found.item_name, "item2", "{backend}");
        assert_eq!(found.price, 20_000, "{backend}");
        assert_eq!(found.quantity, 30, "{backend}");
    });
}

#[test]
fn update_on_missing_id_is_not_found_and_creates_nothing() {
    each_backend(|backend, repo| {
        let err = repo
            .update(999, &ItemUpdateParams::new("ghost", 1, 1))
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(999)), "{backend}: {err:?}");
        assert!(repo.find_by_id(999).unwrap().is_none(), "{backend}");
        assert!(search(repo, None, None).is_empty(), "{backend}");
    });
}

#[test]
fn find_by_id_on_missing_id_is_none() {
    each_backend(|backend, repo| {
        assert_eq!(repo.find_by_id(42).unwrap(), None, "{backend}");
    });
}

#[test]
fn find_all_scenario_matches_every_filter_combination() {
    each_backend(|backend, repo| {
        let (a1, a2, b1) = save_scenario(repo);
        let all = vec![a1.clone(), a2.clone(), b1.clone()];

        assert_eq!(search(repo, None, None), all, "{backend}: no filter");
        assert_eq!(search(repo, Some(""), None), all, "{backend}: empty name");
        assert_eq!(
            search(repo, Some("itemA"), None),
            vec![a1.clone(), a2.clone()],
            "{backend}: prefix"
        );
        assert_eq!(
            search(repo, Some("temA"), None),
            vec![a1.clone(), a2.clone()],
            "{backend}: infix"
        );
        assert_eq!(
            search(repo, Some("itemB"), None),
            vec![b1.clone()],
            "{backend}: other prefix"
        );
        assert_eq!(
            search(repo, None, Some(10_000)),
            vec![a1.clone()],
            "{backend}: inclusive ceiling"
        );
        assert_eq!(
            search(repo, Some("itemA"), Some(10_000)),
            vec![a1],
            "{backend}: both filters"
        );
    });
}

#[test]
fn name_filter_is_case_sensitive() {
    each_backend(|backend, repo| {
        save_scenario(repo);
        assert!(search(repo, Some("itema"), None).is_empty(), "{backend}");
        assert!(search(repo, Some("ITEMA"), None).is_empty(), "{backend}");
    });
}

#[test]
fn wildcard_characters_match_literally() {
    each_backend(|backend, repo| {
        let percent = repo.save(&NewItem::new("50%off", 100, 1)).unwrap();
        let underscore = repo.save(&NewItem::new("a_b", 100, 1)).unwrap();
        repo.save(&NewItem::new("axb", 100, 1)).unwrap();

        assert_eq!(search(repo, Some("%"), None), vec![percent], "{backend}");
        assert_eq!(search(repo, Some("a_b"), None), vec![underscore], "{backend}");
    });
}

#[test]
fn whitespace_only_name_means_no_constraint() {
    each_backend(|backend, repo| {
        let (a1, _, _) = save_scenario(repo);
        assert_eq!(search(repo, Some("   "), Some(10_000)), vec![a1], "{backend}");
    });
}

#[test]
fn negative_values_are_stored_as_given() {
    each_backend(|backend, repo| {
        let saved = repo.save(&NewItem::new("refund", -500, -1)).unwrap();
        let found = repo.find_by_id(saved.id).unwrap().unwrap();
        assert_eq!((found.price, found.quantity), (-500, -1), "{backend}");
        assert_eq!(search(repo, None, Some(0)), vec![found], "{backend}");
    });
}
