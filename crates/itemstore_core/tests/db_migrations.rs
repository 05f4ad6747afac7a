use itemstore_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use itemstore_core::db::{open_db, open_db_in_memory, DbError};
use itemstore_core::{ItemRepository, NewItem, SqlItemRepository};
use rusqlite::Connection;

#[test]
fn in_memory_database_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert!(schema_object_exists(&conn, "table", "item"));
    assert!(schema_object_exists(&conn, "index", "idx_item_price"));
}

#[test]
fn reopening_a_file_applies_nothing_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.db");

    let first = open_db(&path).unwrap();
    let saved = SqlItemRepository::try_new(&first)
        .unwrap()
        .save(&NewItem::new("itemA", 10_000, 10))
        .unwrap();
    drop(first);

    let mut second = open_db(&path).unwrap();
    assert_eq!(apply_migrations(&mut second).unwrap(), 0);
    let found = SqlItemRepository::try_new(&second)
        .unwrap()
        .find_by_id(saved.id)
        .unwrap();
    assert_eq!(found, Some(saved));
}

#[test]
fn raw_connection_reports_every_applied_step() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), 0);

    let applied = apply_migrations(&mut conn).unwrap();
    assert_eq!(applied, latest_version() as usize);
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlItemRepository::try_new(&conn).unwrap();

    let first = repo.save(&NewItem::new("itemA", 1, 1)).unwrap();
    conn.execute("DELETE FROM item WHERE id = ?1;", [first.id])
        .unwrap();
    let second = repo.save(&NewItem::new("itemB", 1, 1)).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2);",
        [kind, name],
        |row| row.get(0),
    )
    .unwrap()
}
