//! Entity CRUD handlers: create, list, read, update, delete. Generic over the record type;
//! [`crate::routes::entity_routes`] mounts one set per entity.

use crate::error::AppError;
use crate::model::Entity;
use crate::response::{created, deleted, ok};
use crate::service::{ensure_no_duplicate, ensure_references, CrudService, RequestValidator};
use crate::sql::{Fields, PgBindValue};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    match id_str.parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::BadRequest("invalid id".into())),
    }
}

fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    let Json(value) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn not_found<T: Entity>(id: i32) -> AppError {
    AppError::NotFound(format!("{} {} not found", T::def().label, id))
}

pub async fn list<T: Entity>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let entity = T::def();
    let mut limit: Option<u32> = None;
    let mut offset: Option<u32> = None;
    let mut filters = Fields::default();

    for (k, v) in params {
        match k.as_str() {
            "limit" => {
                limit = Some(v.parse().map_err(|_| AppError::BadRequest("invalid limit".into()))?);
            }
            "offset" => {
                offset = Some(v.parse().map_err(|_| AppError::BadRequest("invalid offset".into()))?);
            }
            _ => {
                if let Some(column) = entity.column(&k) {
                    filters.push(column.name, PgBindValue::from_query(column, &v)?);
                }
            }
        }
    }

    let rows = CrudService::list::<T>(&state.pool, &filters, limit, offset).await?;
    Ok(ok(rows))
}

pub async fn create<T: Entity>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let fields = RequestValidator::validate(T::def(), &body)?;
    ensure_references::<T>(&state.pool, &fields).await?;
    ensure_no_duplicate::<T>(&state.pool, &fields).await?;
    let row: T = CrudService::create::<T>(&state.pool, &fields).await?;
    tracing::info!(entity = T::def().label, id = row.id(), "created");
    Ok(created(row))
}

pub async fn read<T: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row: T = CrudService::read::<T>(&state.pool, id).await?.ok_or_else(|| not_found::<T>(id))?;
    Ok(ok(row))
}

/// PUT and PATCH: supplied columns replace stored ones; omitted columns are left alone.
pub async fn update<T: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    let fields = RequestValidator::validate_partial(T::def(), &body)?;
    ensure_references::<T>(&state.pool, &fields).await?;
    let row: T = CrudService::update::<T>(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    tracing::info!(entity = T::def().label, id, columns = fields.len(), "updated");
    Ok(ok(row))
}

pub async fn delete<T: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let _row: T = CrudService::delete::<T>(&state.pool, id).await?.ok_or_else(|| not_found::<T>(id))?;
    tracing::info!(entity = T::def().label, id, "deleted");
    Ok(deleted(T::def().label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12").unwrap(), 12);
        for bad in ["", "abc", "1.5", "-3", "0", "99999999999"] {
            assert!(matches!(parse_id(bad), Err(AppError::BadRequest(_))), "{bad}");
        }
    }
}
