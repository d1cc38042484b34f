use super::{ColumnDef, ColumnType, Entity, EntityDef, Timestamps};
use crate::sql::{Fields, PgBindValue};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

pub(super) static DEF: EntityDef = EntityDef {
    label: "role",
    schema_name: "Role",
    tag: "Roles",
    table: "roles",
    path: "roles",
    pk: "rol_id",
    columns: &[
        ColumnDef::new("nombre_rol", ColumnType::Text, "Role name"),
        ColumnDef::new("descripcion", ColumnType::Text, "What the role grants"),
    ],
};

/// Access role. Owns many users.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Role {
    pub rol_id: i32,
    pub nombre_rol: String,
    pub descripcion: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Role {
    const CHECKS_DUPLICATES: bool = true;

    fn def() -> &'static EntityDef {
        &DEF
    }

    fn id(&self) -> i32 {
        self.rol_id
    }

    /// Role names are unique among active roles.
    fn duplicates(&self, candidate: &Fields) -> bool {
        matches!(candidate.get("nombre_rol"), Some(PgBindValue::Text(name)) if *name == self.nombre_rol)
    }
}
