use super::{ColumnDef, ColumnType, Entity, EntityDef, Timestamps};
use crate::sql::{Fields, PgBindValue};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

pub(super) static DEF: EntityDef = EntityDef {
    label: "appointment",
    schema_name: "Appointment",
    tag: "Test-drive appointments",
    table: "prueba_cita_manejos",
    path: "citas",
    pk: "cita_id",
    columns: &[
        ColumnDef::new("fecha_cita", ColumnType::Timestamp, "Day of the test drive"),
        ColumnDef::new("hora_cita", ColumnType::Text, "Time slot"),
        ColumnDef::new("estado", ColumnType::Text, "Appointment status"),
        ColumnDef::new("notas", ColumnType::Text, "Notes"),
        ColumnDef::new("usuario_id", ColumnType::Integer, "Requesting user").references("usuarios", "usuario_id", "user"),
        ColumnDef::new("vehiculo_id", ColumnType::Integer, "Vehicle to test").references("vehiculos", "vehiculo_id", "vehicle"),
    ],
};

/// Test-drive appointment for one vehicle.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Appointment {
    pub cita_id: i32,
    pub fecha_cita: DateTime<Utc>,
    pub hora_cita: String,
    pub estado: String,
    pub notas: String,
    pub usuario_id: i32,
    pub vehiculo_id: i32,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Appointment {
    const CHECKS_DUPLICATES: bool = true;

    fn def() -> &'static EntityDef {
        &DEF
    }

    fn id(&self) -> i32 {
        self.cita_id
    }

    /// A vehicle takes one appointment per day and slot.
    fn duplicates(&self, candidate: &Fields) -> bool {
        let same_day = matches!(candidate.get("fecha_cita"), Some(PgBindValue::Timestamp(d)) if *d == self.fecha_cita);
        let same_slot = matches!(candidate.get("hora_cita"), Some(PgBindValue::Text(h)) if *h == self.hora_cita);
        let same_vehicle = matches!(candidate.get("vehiculo_id"), Some(PgBindValue::Int(v)) if *v == self.vehiculo_id);
        same_day && same_slot && same_vehicle
    }
}
