//! Builds parameterized SELECT, INSERT, UPDATE and soft-delete statements from an entity definition.
//! Identifiers come from the static model only; values always travel as parameters.

use super::params::{Fields, PgBindValue};
use crate::model::{ColumnDef, EntityDef};

/// Quote identifier for PostgreSQL.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its typed placeholder, e.g. `$2::integer`.
    fn push_param(&mut self, column: &ColumnDef, v: PgBindValue) -> String {
        self.push_typed(v, column.ty.pg_type())
    }

    fn push_typed(&mut self, v: PgBindValue, pg_type: &str) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), pg_type)
    }
}

/// Primary key, writable columns and bookkeeping columns, in struct order.
fn select_column_list(entity: &EntityDef) -> String {
    std::iter::once(entity.pk)
        .chain(entity.columns.iter().map(|c| c.name))
        .chain(["created_at", "updated_at", "deleted_at"])
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

const ACTIVE: &str = "\"deleted_at\" IS NULL";

/// SELECT active rows, optional exact-match filters, ordered by primary key. Paging bounds are
/// bound after the filter values.
pub fn select_list(entity: &EntityDef, filters: &Fields, limit: Option<u32>, offset: Option<u32>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = vec![ACTIVE.to_string()];
    for (col, val) in filters.iter() {
        if let Some(column) = entity.column(col) {
            let ph = q.push_param(column, val.clone());
            where_parts.push(format!("{} = {}", quoted(col), ph));
        }
    }
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {}",
        select_column_list(entity),
        quoted(entity.table),
        where_parts.join(" AND "),
        quoted(entity.pk)
    );
    if let Some(l) = limit {
        let ph = q.push_typed(PgBindValue::BigInt(i64::from(l)), "bigint");
        q.sql.push_str(" LIMIT ");
        q.sql.push_str(&ph);
    }
    if let Some(o) = offset {
        let ph = q.push_typed(PgBindValue::BigInt(i64::from(o)), "bigint");
        q.sql.push_str(" OFFSET ");
        q.sql.push_str(&ph);
    }
    q
}

/// SELECT one active row by primary key. Caller binds the id as `$1`.
pub fn select_by_id(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = $1 AND {}",
        select_column_list(entity),
        quoted(entity.table),
        quoted(entity.pk),
        ACTIVE
    );
    q
}

/// `SELECT EXISTS` for an active row of `table` by `pk`. Caller binds the id as `$1`.
pub fn exists_active(table: &str, pk: &str) -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND {})",
        quoted(table),
        quoted(pk),
        ACTIVE
    )
}

/// INSERT the supplied columns; pk and timestamps come from column defaults.
pub fn insert(entity: &EntityDef, fields: &Fields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (col, val) in fields.iter() {
        if let Some(column) = entity.column(col) {
            cols.push(quoted(col));
            placeholders.push(q.push_param(column, val.clone()));
        }
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(entity)
    );
    q
}

/// UPDATE the supplied columns of one active row and bump `updated_at`.
/// The id is bound as the last parameter.
pub fn update(entity: &EntityDef, id: i32, fields: &Fields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (col, val) in fields.iter() {
        if let Some(column) = entity.column(col) {
            let ph = q.push_param(column, val.clone());
            sets.push(format!("{} = {}", quoted(col), ph));
        }
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    q.params.push(PgBindValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}::integer AND {} RETURNING {}",
        quoted(entity.table),
        sets.join(", "),
        quoted(entity.pk),
        q.params.len(),
        ACTIVE,
        select_column_list(entity)
    );
    q
}

/// Mark one active row deleted. Caller binds the id as `$1`.
pub fn soft_delete(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "UPDATE {} SET \"deleted_at\" = NOW(), \"updated_at\" = NOW() WHERE {} = $1 AND {} RETURNING {}",
        quoted(entity.table),
        quoted(entity.pk),
        ACTIVE,
        select_column_list(entity)
    );
    q
}

/// Mark active children whose `fk` is in the bound `$1` id array deleted; returns their ids.
pub fn cascade_soft_delete(child: &EntityDef, fk: &ColumnDef) -> String {
    format!(
        "UPDATE {} SET \"deleted_at\" = NOW(), \"updated_at\" = NOW() WHERE {} = ANY($1) AND {} RETURNING {}",
        quoted(child.table),
        quoted(fk.name),
        ACTIVE,
        quoted(child.pk)
    )
}
