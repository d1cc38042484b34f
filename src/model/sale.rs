use super::{ColumnDef, ColumnType, Entity, EntityDef, Timestamps};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

pub(super) static DEF: EntityDef = EntityDef {
    label: "sale",
    schema_name: "Sale",
    tag: "Sales",
    table: "ventas",
    path: "ventas",
    pk: "venta_id",
    columns: &[
        ColumnDef::new("fecha", ColumnType::Timestamp, "Date of sale"),
        ColumnDef::new("precio_final", ColumnType::Integer, "Agreed price"),
        ColumnDef::new("usuario_id", ColumnType::Integer, "Buyer").references("usuarios", "usuario_id", "user"),
        ColumnDef::new("vehiculo_id", ColumnType::Integer, "Vehicle sold").references("vehiculos", "vehiculo_id", "vehicle"),
        ColumnDef::new("estado_venta", ColumnType::Text, "Sale status"),
    ],
};

#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Sale {
    pub venta_id: i32,
    pub fecha: DateTime<Utc>,
    pub precio_final: i32,
    pub usuario_id: i32,
    pub vehiculo_id: i32,
    pub estado_venta: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Sale {
    fn def() -> &'static EntityDef {
        &DEF
    }

    fn id(&self) -> i32 {
        self.venta_id
    }
}
