//! Request validation against the entity definition.

use crate::error::AppError;
use crate::model::EntityDef;
use crate::sql::{is_blank, Fields, PgBindValue};
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body: every column must be present and non-empty.
    /// Keys outside the model (including the pk and timestamps) are ignored.
    pub fn validate(entity: &EntityDef, body: &Map<String, Value>) -> Result<Fields, AppError> {
        let missing: Vec<&str> = entity
            .columns
            .iter()
            .filter(|c| body.get(c.name).map(is_blank).unwrap_or(true))
            .map(|c| c.name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        let mut fields = Fields::default();
        for column in entity.columns {
            if let Some(v) = body.get(column.name) {
                fields.push(column.name, PgBindValue::from_json(column, v)?);
            }
        }
        Ok(fields)
    }

    /// Validate only the columns present in the body (PUT/PATCH). Present values must still be non-empty.
    pub fn validate_partial(entity: &EntityDef, body: &Map<String, Value>) -> Result<Fields, AppError> {
        let mut fields = Fields::default();
        for column in entity.columns {
            if let Some(v) = body.get(column.name) {
                fields.push(column.name, PgBindValue::from_json(column, v)?);
            }
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, Role, User, Vehicle};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn lists_every_missing_field() {
        let err = RequestValidator::validate(Role::def(), &obj(json!({ "descripcion": "" }))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "missing required fields: nombre_rol, descripcion");
    }

    #[test]
    fn full_body_is_coerced_in_column_order() {
        let body = obj(json!({
            "usuario_id": 99,
            "telefono": "555",
            "nombre": "Ana",
            "apellido": "Ruiz",
            "email": "ana@example.com",
            "contraseña": "secret",
            "rol_id": "2",
            "extra": true
        }));
        let fields = RequestValidator::validate(User::def(), &body).unwrap();
        let names: Vec<_> = fields.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["nombre", "apellido", "email", "contraseña", "telefono", "rol_id"]);
        assert_eq!(fields.get("rol_id"), Some(&PgBindValue::Int(2)));
    }

    #[test]
    fn bad_type_is_a_validation_error() {
        let body = obj(json!({
            "marca": "Toyota", "modelo": "Corolla", "precio": "cheap", "año": 2020,
            "kilometraje": "1000", "color": "red", "tipo_combustible": "gas",
            "descripcion": "ok", "estado": "disponible", "usuario_id": 1
        }));
        let err = RequestValidator::validate(Vehicle::def(), &body).unwrap_err();
        assert_eq!(err.to_string(), "precio must be an integer");
    }

    #[test]
    fn partial_only_checks_present_columns() {
        let fields = RequestValidator::validate_partial(Role::def(), &obj(json!({ "descripcion": "new" }))).unwrap();
        assert_eq!(fields.len(), 1);
        let empty = RequestValidator::validate_partial(Role::def(), &obj(json!({}))).unwrap();
        assert!(empty.is_empty());
        assert!(RequestValidator::validate_partial(Role::def(), &obj(json!({ "nombre_rol": null }))).is_err());
    }
}
