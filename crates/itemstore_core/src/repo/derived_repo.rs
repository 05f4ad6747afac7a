//! SQLite item repository built from fixed finder statements.
//!
//! # Responsibility
//! - Serve `find_all` from four static statements, one per filter
//!   combination, instead of composing SQL at runtime.
//! - Perform `update` as load, mutate, write inside one transaction.
//!
//! # Invariants
//! - Finder selection depends only on which filters are effectively set.
//! - `update` never writes when the load step finds nothing.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{
    collect_items, ensure_item_connection_ready, parse_item_row, ItemRepository, RepoError,
    RepoResult,
};
use log::debug;
use rusqlite::{params, Connection};

const FIND_ALL_SQL: &str = "SELECT id, item_name, price, quantity FROM item ORDER BY id ASC;";
const FIND_BY_NAME_SQL: &str = "SELECT id, item_name, price, quantity FROM item
     WHERE instr(item_name, ?1) > 0
     ORDER BY id ASC;";
const FIND_BY_MAX_PRICE_SQL: &str = "SELECT id, item_name, price, quantity FROM item
     WHERE price <= ?1
     ORDER BY id ASC;";
const FIND_BY_NAME_AND_MAX_PRICE_SQL: &str = "SELECT id, item_name, price, quantity FROM item
     WHERE instr(item_name, ?1) > 0 AND price <= ?2
     ORDER BY id ASC;";

/// Which of the fixed finder statements a search condition resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finder<'a> {
    All,
    ByName(&'a str),
    ByMaxPrice(i64),
    ByNameAndMaxPrice(&'a str, i64),
}

impl<'a> Finder<'a> {
    fn for_cond(cond: &'a ItemSearchCond) -> Self {
        match (cond.name_filter(), cond.max_price) {
            (Some(name), Some(max_price)) => Self::ByNameAndMaxPrice(name, max_price),
            (Some(name), None) => Self::ByName(name),
            (None, Some(max_price)) => Self::ByMaxPrice(max_price),
            (None, None) => Self::All,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::All => "find_all",
            Self::ByName(_) => "find_by_name",
            Self::ByMaxPrice(_) => "find_by_max_price",
            Self::ByNameAndMaxPrice(..) => "find_by_name_and_max_price",
        }
    }
}

/// SQLite-backed item repository with one prepared finder per filter shape.
pub struct DerivedItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> DerivedItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn load(conn: &Connection, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, item_name, price, quantity FROM item WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }
}

impl ItemRepository for DerivedItemRepository<'_> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO item (item_name, price, quantity) VALUES (?1, ?2, ?3) RETURNING id;",
        )?;
        let id: ItemId = stmt.query_row(
            params![item.item_name.as_str(), item.price, item.quantity],
            |row| row.get(0),
        )?;

        debug!("event=item_save module=repo backend=derived status=ok item_id={id}");
        Ok(Item::from_new(id, item))
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let mut item = Self::load(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        item.apply_update(params);
        tx.execute(
            "UPDATE item SET item_name = ?1, price = ?2, quantity = ?3 WHERE id = ?4;",
            params![item.item_name.as_str(), item.price, item.quantity, item.id],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Self::load(self.conn, id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let finder = Finder::for_cond(cond);
        debug!(
            "event=item_find_all module=repo backend=derived finder={}",
            finder.name()
        );

        let items = match finder {
            Finder::All => {
                let mut stmt = self.conn.prepare_cached(FIND_ALL_SQL)?;
                let rows = stmt.query([])?;
                collect_items(rows)?
            }
            Finder::ByName(name) => {
                let mut stmt = self.conn.prepare_cached(FIND_BY_NAME_SQL)?;
                let rows = stmt.query([name])?;
                collect_items(rows)?
            }
            Finder::ByMaxPrice(max_price) => {
                let mut stmt = self.conn.prepare_cached(FIND_BY_MAX_PRICE_SQL)?;
                let rows = stmt.query([max_price])?;
                collect_items(rows)?
            }
            Finder::ByNameAndMaxPrice(name, max_price) => {
                let mut stmt = self.conn.prepare_cached(FIND_BY_NAME_AND_MAX_PRICE_SQL)?;
                let rows = stmt.query(params![name, max_price])?;
                collect_items(rows)?
            }
        };

        Ok(items)
    }
}
