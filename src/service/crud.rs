//! Generic CRUD execution against PostgreSQL, one implementation for every [`Entity`].

use crate::error::AppError;
use crate::model::{dependents, Entity};
use crate::sql::{cascade_soft_delete, exists_active, insert, select_by_id, select_list, soft_delete, update, Fields, QueryBuf};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

pub struct CrudService;

impl CrudService {
    /// Active rows in primary-key order. Filters are exact matches; no limit unless one is given.
    pub async fn list<T: Entity>(
        pool: &PgPool,
        filters: &Fields,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<T>, AppError> {
        let q = select_list(T::def(), filters, limit, offset);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all::<T>(&q).fetch_all(pool).await?;
        Ok(rows)
    }

    /// One active row by primary key, or None.
    pub async fn read<T: Entity>(pool: &PgPool, id: i32) -> Result<Option<T>, AppError> {
        let q = select_by_id(T::def());
        tracing::debug!(sql = %q.sql, id, "query");
        let row = sqlx::query_as::<_, T>(&q.sql).bind(id).fetch_optional(pool).await?;
        Ok(row)
    }

    /// Insert one row. Returns it with generated id and timestamps.
    pub async fn create<T: Entity>(pool: &PgPool, fields: &Fields) -> Result<T, AppError> {
        let q = insert(T::def(), fields);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all::<T>(&q).fetch_one(pool).await?;
        Ok(row)
    }

    /// Replace the supplied columns of one active row. None if there is no such row.
    pub async fn update<T: Entity>(pool: &PgPool, id: i32, fields: &Fields) -> Result<Option<T>, AppError> {
        let q = update(T::def(), id, fields);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all::<T>(&q).fetch_optional(pool).await?;
        Ok(row)
    }

    /// Soft-delete one active row and, in the same transaction, every active row that depends on it
    /// through a foreign key, transitively. Returns the deleted row or None.
    pub async fn delete<T: Entity>(pool: &PgPool, id: i32) -> Result<Option<T>, AppError> {
        let entity = T::def();
        let q = soft_delete(entity);
        let mut tx = pool.begin().await?;
        tracing::debug!(sql = %q.sql, id, "query (tx)");
        let Some(row) = sqlx::query_as::<_, T>(&q.sql).bind(id).fetch_optional(&mut *tx).await? else {
            return Ok(None);
        };

        let mut pending: Vec<(&'static str, Vec<i32>)> = vec![(entity.table, vec![id])];
        while let Some((table, ids)) = pending.pop() {
            for (child, fk) in dependents(table) {
                let sql = cascade_soft_delete(child, fk);
                tracing::debug!(sql = %sql, parents = ?ids, "query (tx)");
                let child_ids: Vec<i32> = sqlx::query_scalar(&sql)
                    .bind(ids.as_slice())
                    .fetch_all(&mut *tx)
                    .await?;
                if !child_ids.is_empty() {
                    tracing::info!(table = child.table, count = child_ids.len(), parent = table, "cascade soft delete");
                    pending.push((child.table, child_ids));
                }
            }
        }
        tx.commit().await?;
        Ok(Some(row))
    }

    /// Whether `table` has an active row with `pk = id`.
    pub async fn exists(pool: &PgPool, table: &str, pk: &str, id: i32) -> Result<bool, AppError> {
        let sql = exists_active(table, pk);
        tracing::debug!(sql = %sql, id, "query");
        let found: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;
        Ok(found)
    }
}

fn bind_all<T: Entity>(q: &QueryBuf) -> QueryAs<'_, Postgres, T, PgArguments> {
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}
