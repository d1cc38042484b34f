use super::{ColumnDef, ColumnType, Entity, EntityDef, Timestamps};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

pub(super) static DEF: EntityDef = EntityDef {
    label: "vehicle",
    schema_name: "Vehicle",
    tag: "Vehicles",
    table: "vehiculos",
    path: "vehiculos",
    pk: "vehiculo_id",
    columns: &[
        ColumnDef::new("marca", ColumnType::Text, "Make"),
        ColumnDef::new("modelo", ColumnType::Text, "Model"),
        ColumnDef::new("precio", ColumnType::Integer, "Listed price"),
        ColumnDef::new("año", ColumnType::Text, "Model year"),
        ColumnDef::new("kilometraje", ColumnType::Text, "Mileage"),
        ColumnDef::new("color", ColumnType::Text, "Color"),
        ColumnDef::new("tipo_combustible", ColumnType::Text, "Fuel type"),
        ColumnDef::new("descripcion", ColumnType::Text, "Free-form description"),
        ColumnDef::new("estado", ColumnType::Text, "Listing status"),
        ColumnDef::new("usuario_id", ColumnType::Integer, "Owning user").references("usuarios", "usuario_id", "user"),
    ],
};

#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub vehiculo_id: i32,
    pub marca: String,
    pub modelo: String,
    pub precio: i32,
    #[serde(rename = "año")]
    #[sqlx(rename = "año")]
    pub anio: String,
    pub kilometraje: String,
    pub color: String,
    pub tipo_combustible: String,
    pub descripcion: String,
    pub estado: String,
    pub usuario_id: i32,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Vehicle {
    fn def() -> &'static EntityDef {
        &DEF
    }

    fn id(&self) -> i32 {
        self.vehiculo_id
    }
}
