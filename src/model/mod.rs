//! Entity model: static table definitions plus the typed records the API serves.
//!
//! Every record type implements [`Entity`], which ties it to an [`EntityDef`]. The SQL builder,
//! request validation, schema sync and API docs are all driven by these definitions, so a new
//! table only needs a record struct and a `DEF`.

mod appointment;
mod role;
mod sale;
mod user;
mod vehicle;

pub use appointment::Appointment;
pub use role::Role;
pub use sale::Sale;
pub use user::User;
pub use vehicle::Vehicle;

use crate::error::ConfigError;
use crate::sql::Fields;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::collections::HashSet;
use utoipa::ToSchema;

/// Column storage type. Drives value coercion, placeholder casts and DDL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Timestamp,
}

impl ColumnType {
    pub fn pg_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Timestamp => "timestamptz",
        }
    }
}

/// Target of a foreign key column.
#[derive(Clone, Copy, Debug)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    /// Singular label of the parent, used in not-found messages.
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub description: &'static str,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType, description: &'static str) -> Self {
        ColumnDef {
            name,
            ty,
            description,
            references: None,
        }
    }

    pub const fn references(mut self, table: &'static str, column: &'static str, label: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column, label });
        self
    }
}

/// One table exposed as a CRUD resource. Writable columns only; the primary key and the
/// `created_at` / `updated_at` / `deleted_at` bookkeeping columns are implied.
#[derive(Debug)]
pub struct EntityDef {
    /// Singular label used in messages ("role").
    pub label: &'static str,
    /// Component name in the OpenAPI document ("Role").
    pub schema_name: &'static str,
    pub tag: &'static str,
    pub table: &'static str,
    /// Path segment under `/api`.
    pub path: &'static str,
    pub pk: &'static str,
    pub columns: &'static [ColumnDef],
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&'static ColumnDef, ForeignKey)> {
        self.columns.iter().filter_map(|c| c.references.map(|fk| (c, fk)))
    }
}

/// Creation / update / soft-delete stamps shared by every table.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Timestamps {
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A typed record backed by one [`EntityDef`].
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    /// Whether creates run the duplicate scan at all.
    const CHECKS_DUPLICATES: bool = false;

    fn def() -> &'static EntityDef;

    fn id(&self) -> i32;

    /// Advisory duplicate check applied before insert. `candidate` holds the coerced request body.
    fn duplicates(&self, _candidate: &Fields) -> bool {
        false
    }
}

/// All tables, parents before children. Schema sync creates them in this order.
pub static MODEL: &[&EntityDef] = &[
    &role::DEF,
    &user::DEF,
    &vehicle::DEF,
    &sale::DEF,
    &appointment::DEF,
];

pub fn entity_by_table(table: &str) -> Option<&'static EntityDef> {
    MODEL.iter().copied().find(|e| e.table == table)
}

/// Tables holding a foreign key into `table`, with the referencing column.
pub fn dependents(table: &str) -> Vec<(&'static EntityDef, &'static ColumnDef)> {
    MODEL
        .iter()
        .copied()
        .flat_map(|e| {
            e.foreign_keys()
                .filter(|(_, fk)| fk.table == table)
                .map(move |(c, _)| (e, c))
        })
        .collect()
}

/// Check the model for dangling references, bad targets, ordering and duplicate paths.
pub fn validate_model(model: &[&EntityDef]) -> Result<(), ConfigError> {
    let mut seen_tables: HashSet<&str> = HashSet::new();
    let mut paths = HashSet::new();
    for e in model {
        if !paths.insert(e.path) {
            return Err(ConfigError::DuplicatePathSegment(e.path.to_string()));
        }
        let mut names = HashSet::new();
        for c in e.columns {
            if c.name == e.pk || !names.insert(c.name) {
                return Err(ConfigError::Validation(format!(
                    "{}: column '{}' declared twice",
                    e.table, c.name
                )));
            }
        }
        for (c, fk) in e.foreign_keys() {
            let target = model.iter().find(|t| t.table == fk.table).ok_or_else(|| ConfigError::MissingReference {
                kind: "table",
                id: fk.table.to_string(),
            })?;
            if target.pk != fk.column {
                return Err(ConfigError::InvalidForeignKey {
                    table: e.table.to_string(),
                    column: c.name.to_string(),
                });
            }
            if c.ty != ColumnType::Integer {
                return Err(ConfigError::InvalidForeignKey {
                    table: e.table.to_string(),
                    column: c.name.to_string(),
                });
            }
            if fk.table != e.table && !seen_tables.contains(fk.table) {
                return Err(ConfigError::Validation(format!(
                    "{} must be declared after {}",
                    e.table, fk.table
                )));
            }
        }
        seen_tables.insert(e.table);
    }
    Ok(())
}
