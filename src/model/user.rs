use super::{ColumnDef, ColumnType, Entity, EntityDef, Timestamps};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

pub(super) static DEF: EntityDef = EntityDef {
    label: "user",
    schema_name: "User",
    tag: "Users",
    table: "usuarios",
    path: "usuarios",
    pk: "usuario_id",
    columns: &[
        ColumnDef::new("nombre", ColumnType::Text, "First name"),
        ColumnDef::new("apellido", ColumnType::Text, "Surname"),
        ColumnDef::new("email", ColumnType::Text, "Contact email"),
        ColumnDef::new("contraseña", ColumnType::Text, "Password"),
        ColumnDef::new("telefono", ColumnType::Text, "Phone number"),
        ColumnDef::new("rol_id", ColumnType::Integer, "Role of the user").references("roles", "rol_id", "role"),
    ],
};

/// Back-office user. Owns vehicles, sales and appointments.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct User {
    pub usuario_id: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(rename = "contraseña")]
    #[sqlx(rename = "contraseña")]
    pub contrasena: String,
    pub telefono: String,
    pub rol_id: i32,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for User {
    fn def() -> &'static EntityDef {
        &DEF
    }

    fn id(&self) -> i32 {
        self.usuario_id
    }
}
