//! Item repository contract and its storage backends.
//!
//! # Responsibility
//! - Define the one data-access contract every backend implements.
//! - Isolate query mechanics (in-memory, SQL, expression builder) from the
//!   service layer.
//!
//! # Invariants
//! - Every backend applies the same `ItemSearchCond` semantics.
//! - `find_by_id` reports absence as `Ok(None)`; `update` reports it as
//!   `RepoError::NotFound`.
//! - Every backend returns `find_all` results in ascending id order.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use rusqlite::{Connection, Row};
use thiserror::Error;

pub mod builder_repo;
pub mod derived_repo;
pub mod memory_repo;
pub mod named_repo;
pub mod sql_repo;

pub(crate) const ITEM_TABLE: &str = "item";
pub(crate) const ITEM_COLUMNS: [&str; 4] = ["id", "item_name", "price", "quantity"];
pub(crate) const ITEM_SELECT_SQL: &str = "SELECT id, item_name, price, quantity FROM item";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("item not found: {0}")]
    NotFound(ItemId),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted item data: {0}")]
    InvalidData(String),
    #[error("failed to build item query: {0}")]
    QueryBuild(String),
    #[error("item store is unavailable: lock poisoned")]
    StoreUnavailable,
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for items.
pub trait ItemRepository {
    /// Stores `item` under a newly assigned id and returns the stored copy.
    fn save(&self, item: &NewItem) -> RepoResult<Item>;
    /// Overwrites name, price and quantity of an existing item.
    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()>;
    /// Looks up one item; absence is not an error.
    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Returns every item matching `cond`, ordered by ascending id.
    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>>;
}

/// Read-only search contract for query-side components.
pub trait ItemQueryRepository {
    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>>;
}

impl<R: ItemRepository + ?Sized> ItemRepository for &R {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        (**self).save(item)
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        (**self).update(id, params)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        (**self).find_all(cond)
    }
}

impl<R: ItemRepository + ?Sized> ItemRepository for Box<R> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        (**self).save(item)
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        (**self).update(id, params)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        (**self).find_all(cond)
    }
}

/// Verifies that `conn` is migrated and carries the `item` table shape.
///
/// Every SQL backend calls this from `try_new` so that a raw, unmigrated
/// connection is rejected up front instead of failing on the first query.
pub(crate) fn ensure_item_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, ITEM_TABLE)? {
        return Err(RepoError::MissingRequiredTable(ITEM_TABLE));
    }

    for column in ITEM_COLUMNS {
        if !table_has_column(conn, ITEM_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: ITEM_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Maps one `item` row (selected with `ITEM_SELECT_SQL` columns) to an `Item`.
pub(crate) fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "non-positive id `{id}` in item.id"
        )));
    }

    Ok(Item {
        id,
        item_name: row.get("item_name")?,
        price: row.get("price")?,
        quantity: row.get("quantity")?,
    })
}

/// Drains a prepared query into items.
pub(crate) fn collect_items(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Item>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_item_row(row)?);
    }
    Ok(items)
}
