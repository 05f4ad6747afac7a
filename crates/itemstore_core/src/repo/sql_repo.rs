//! SQLite item repository using positional parameters.
//!
//! # Responsibility
//! - Implement the item contract with hand-written SQL and `?` binds.
//! - Compose the optional search predicates by string concatenation.
//!
//! # Invariants
//! - User input only ever reaches SQLite as a bound value.
//! - Name matching uses `instr`, so it is case-sensitive and `%`/`_` are
//!   literal characters.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{
    collect_items, ensure_item_connection_ready, parse_item_row, ItemRepository, RepoError,
    RepoResult, ITEM_SELECT_SQL,
};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// SQLite-backed item repository with positional binds.
pub struct SqlItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqlItemRepository<'_> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        self.conn.execute(
            "INSERT INTO item (item_name, price, quantity) VALUES (?1, ?2, ?3);",
            params![item.item_name.as_str(), item.price, item.quantity],
        )?;

        // Generated key of the insert above, read on the same connection.
        let id = self.conn.last_insert_rowid();
        debug!("event=item_save module=repo backend=sql status=ok item_id={id}");
        Ok(Item::from_new(id, item))
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE item
             SET
                item_name = ?1,
                price = ?2,
                quantity = ?3
             WHERE id = ?4;",
            params![params.item_name.as_str(), params.price, params.quantity, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = cond.name_filter() {
            sql.push_str(" AND instr(item_name, ?) > 0");
            bind_values.push(Value::Text(name.to_string()));
        }

        if let Some(max_price) = cond.max_price {
            sql.push_str(" AND price <= ?");
            bind_values.push(Value::Integer(max_price));
        }

        sql.push_str(" ORDER BY id ASC");
        debug!("event=item_find_all module=repo backend=sql sql={sql:?}");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query(params_from_iter(bind_values))?;
        collect_items(rows)
    }
}
