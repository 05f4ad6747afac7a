//! SQLite item repository built on the sea-query expression builder.
//!
//! # Responsibility
//! - Express every item statement as a typed sea-query AST.
//! - Fold optional predicates into one `Condition::all()`; an absent
//!   filter contributes no expression at all.
//! - Serve as the query side (`ItemQueryRepository`) of the split service.
//!
//! # Invariants
//! - Statements are rendered with placeholders; values are bound through
//!   rusqlite, never inlined.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateParams, NewItem};
use crate::repo::{
    collect_items, ensure_item_connection_ready, parse_item_row, ItemQueryRepository,
    ItemRepository, RepoError, RepoResult,
};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use sea_query::{
    Alias, Condition, Expr, Func, Iden, Order, Query, SimpleExpr, SqliteQueryBuilder, Values,
};

#[derive(Iden, Clone, Copy)]
#[iden = "item"]
enum ItemTable {
    Table,
    Id,
    ItemName,
    Price,
    Quantity,
}

const SELECT_COLUMNS: [ItemTable; 4] = [
    ItemTable::Id,
    ItemTable::ItemName,
    ItemTable::Price,
    ItemTable::Quantity,
];

/// SQLite-backed item repository whose SQL comes from sea-query.
pub struct BuilderItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> BuilderItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_items(&self, sql: &str, values: Values) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query(params_from_iter(bind_values(values)?))?;
        collect_items(rows)
    }
}

impl ItemRepository for BuilderItemRepository<'_> {
    fn save(&self, item: &NewItem) -> RepoResult<Item> {
        let (sql, values) = Query::insert()
            .into_table(ItemTable::Table)
            .columns([ItemTable::ItemName, ItemTable::Price, ItemTable::Quantity])
            .values([
                item.item_name.as_str().into(),
                item.price.into(),
                item.quantity.into(),
            ])
            .map_err(|err| RepoError::QueryBuild(err.to_string()))?
            .returning_col(ItemTable::Id)
            .build(SqliteQueryBuilder);

        let id: ItemId = self.conn.query_row(
            &sql,
            params_from_iter(bind_values(values)?),
            |row| row.get(0),
        )?;

        debug!("event=item_save module=repo backend=builder status=ok item_id={id}");
        Ok(Item::from_new(id, item))
    }

    fn update(&self, id: ItemId, params: &ItemUpdateParams) -> RepoResult<()> {
        let (sql, values) = Query::update()
            .table(ItemTable::Table)
            .values([
                (ItemTable::ItemName, params.item_name.as_str().into()),
                (ItemTable::Price, params.price.into()),
                (ItemTable::Quantity, params.quantity.into()),
            ])
            .and_where(Expr::col(ItemTable::Id).eq(id))
            .build(SqliteQueryBuilder);

        let changed = self
            .conn
            .execute(&sql, params_from_iter(bind_values(values)?))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let (sql, values) = Query::select()
            .columns(SELECT_COLUMNS)
            .from(ItemTable::Table)
            .and_where(Expr::col(ItemTable::Id).eq(id))
            .build(SqliteQueryBuilder);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values(values)?))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let (sql, values) = search_statement(cond);
        debug!("event=item_find_all module=repo backend=builder sql={sql:?}");
        self.query_items(&sql, values)
    }
}

impl ItemQueryRepository for BuilderItemRepository<'_> {
    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        ItemRepository::find_all(self, cond)
    }
}

fn search_statement(cond: &ItemSearchCond) -> (String, Values) {
    let mut select = Query::select();
    select.columns(SELECT_COLUMNS).from(ItemTable::Table);
    if !cond.is_unconstrained() {
        select.cond_where(
            Condition::all()
                .add_option(like_item_name(cond.name_filter()))
                .add_option(max_price(cond.max_price)),
        );
    }
    select
        .order_by(ItemTable::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

fn like_item_name(name: Option<&str>) -> Option<SimpleExpr> {
    name.map(|name| {
        Expr::expr(
            Func::cust(Alias::new("instr"))
                .arg(Expr::col(ItemTable::ItemName))
                .arg(name),
        )
        .gt(0)
    })
}

fn max_price(max_price: Option<i64>) -> Option<SimpleExpr> {
    max_price.map(|max_price| Expr::col(ItemTable::Price).lte(max_price))
}

fn bind_values(values: Values) -> RepoResult<Vec<Value>> {
    values.0.into_iter().map(to_sqlite_value).collect()
}

fn to_sqlite_value(value: sea_query::Value) -> RepoResult<Value> {
    use sea_query::Value as Sea;

    let converted = match value {
        Sea::Bool(v) => v.map(|b| Value::Integer(i64::from(b))),
        Sea::TinyInt(v) => v.map(|n| Value::Integer(i64::from(n))),
        Sea::SmallInt(v) => v.map(|n| Value::Integer(i64::from(n))),
        Sea::Int(v) => v.map(|n| Value::Integer(i64::from(n))),
        Sea::BigInt(v) => v.map(Value::Integer),
        Sea::TinyUnsigned(v) => v.map(|n| Value::Integer(i64::from(n))),
        Sea::SmallUnsigned(v) => v.map(|n| Value::Integer(i64::from(n))),
        Sea::Unsigned(v) => v.map(|n| Value::Integer(i64::from(n))),
        Sea::Float(v) => v.map(|f| Value::Real(f64::from(f))),
        Sea::Double(v) => v.map(Value::Real),
        Sea::Char(v) => v.map(|c| Value::Text(c.to_string())),
        Sea::String(v) => v.map(|s| Value::Text(*s)),
        Sea::Bytes(v) => v.map(|b| Value::Blob(*b)),
        other => {
            return Err(RepoError::QueryBuild(format!(
                "unsupported bind value {other:?}"
            )))
        }
    };

    Ok(converted.unwrap_or(Value::Null))
}
