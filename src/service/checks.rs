//! Pre-write checks run by the handlers: foreign-key targets and advisory duplicates.

use super::CrudService;
use crate::error::AppError;
use crate::model::Entity;
use crate::sql::{Fields, PgBindValue};
use sqlx::PgPool;

/// Every foreign key present in `fields` must point at an active parent row.
pub async fn ensure_references<T: Entity>(pool: &PgPool, fields: &Fields) -> Result<(), AppError> {
    for (column, fk) in T::def().foreign_keys() {
        if let Some(PgBindValue::Int(id)) = fields.get(column.name) {
            if !CrudService::exists(pool, fk.table, fk.column, *id).await? {
                return Err(AppError::NotFound(format!("{} {} not found", fk.label, id)));
            }
        }
    }
    Ok(())
}

/// Reject `fields` if an active row already matches [`Entity::duplicates`].
///
/// Scans the full table and is not atomic with the insert that follows: two concurrent
/// identical requests can both pass. Uniqueness is not enforced by the store.
pub async fn ensure_no_duplicate<T: Entity>(pool: &PgPool, fields: &Fields) -> Result<(), AppError> {
    if !T::CHECKS_DUPLICATES {
        return Ok(());
    }
    let existing = CrudService::list::<T>(pool, &Fields::default(), None, None).await?;
    if let Some(dup) = existing.iter().find(|row| row.duplicates(fields)) {
        tracing::info!(entity = T::def().label, id = dup.id(), "duplicate rejected");
        return Err(AppError::Conflict(format!(
            "{} already exists (id {})",
            T::def().label,
            dup.id()
        )));
    }
    Ok(())
}
