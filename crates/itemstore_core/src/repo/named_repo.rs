//! SQLite item repository using named parameters.
//!
//! # Responsibility
//! - Implement the item contract with `:name` binds instead of positions.
//! - Build inserts from a table/column description and return the
//!   generated key.
//!
//! # Invariants
//! - A bind name appears in the SQL only when its value is bound.
//! - Name matching uses `instr` (case-sensitive, no wildcards).

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{
    collect_items, ensure_item_connection_ready, parse_item_row, ItemRepository, RepoError,
    RepoResult, ITEM_SELECT_SQL, ITEM_TABLE,
};
use log::debug;
use rusqlite::{named_params, Connection, ToSql};

/// Insert statement derived from a table name and the columns being written.
///
/// The key column is left to SQLite and read back after the insert.
struct TableInsert {
    table: &'static str,
    columns: &'static [&'static str],
}

impl TableInsert {
    fn sql(&self) -> String {
        let placeholders: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!(":{column}"))
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.table,
            self.columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// Executes the insert and returns the generated key.
    fn execute_and_return_key(
        &self,
        conn: &Connection,
        values: &[(&str, &dyn ToSql)],
    ) -> RepoResult<ItemId> {
        let mut stmt = conn.prepare_cached(&self.sql())?;
        stmt.execute(values)?;
        Ok(conn.last_insert_rowid())
    }
}

const ITEM_INSERT: TableInsert = TableInsert {
    table: ITEM_TABLE,
    columns: &["item_name", "price", "quantity"],
};

/// SQLite-backed item repository with named binds.
pub struct NamedSqlItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> NamedSqlItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for NamedSqlItemRepository<'_> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        let id = ITEM_INSERT.execute_and_return_key(
            self.conn,
            named_params! {
                ":item_name": item.item_name,
                ":price": item.price,
                ":quantity": item.quantity,
            },
        )?;

        debug!("event=item_save module=repo backend=named_sql status=ok item_id={id}");
        Ok(Item::from_new(id, item))
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE item
             SET item_name = :item_name, price = :price, quantity = :quantity
             WHERE id = :id;",
            named_params! {
                ":item_name": params.item_name,
                ":price": params.price,
                ":quantity": params.quantity,
                ":id": id,
            },
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = :id;"))?;
        let mut rows = stmt.query(named_params! { ":id": id })?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let name = cond.name_filter();
        let mut sql = String::from(ITEM_SELECT_SQL);
        let mut binds: Vec<(&str, &dyn ToSql)> = Vec::new();

        if !cond.is_unconstrained() {
            sql.push_str(" WHERE");
        }

        let mut and_flag = false;
        if let Some(name) = name.as_ref() {
            sql.push_str(" instr(item_name, :item_name) > 0");
            binds.push((":item_name", name as &dyn ToSql));
            and_flag = true;
        }

        if let Some(max_price) = cond.max_price.as_ref() {
            if and_flag {
                sql.push_str(" AND");
            }
            sql.push_str(" price <= :max_price");
            binds.push((":max_price", max_price as &dyn ToSql));
        }

        sql.push_str(" ORDER BY id ASC");
        debug!("event=item_find_all module=repo backend=named_sql sql={sql:?}");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query(binds.as_slice())?;
        collect_items(rows)
    }
}
