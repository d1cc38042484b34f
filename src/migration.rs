//! Schema sync: create every model table in dependency order, then add any column a table is
//! missing. Additive only; nothing is dropped or retyped, and there is no version history.

use crate::error::AppError;
use crate::model::{validate_model, EntityDef, MODEL};
use crate::sql::quoted;
use sqlx::PgPool;

fn column_def(name: &str, pg_type: &str, not_null: bool) -> String {
    let mut def = format!("{} {}", quoted(name), pg_type);
    if not_null {
        def.push_str(" NOT NULL");
    }
    def
}

/// CREATE TABLE IF NOT EXISTS with pk, columns, timestamps and cascading foreign keys.
pub fn create_table_ddl(entity: &EntityDef) -> String {
    let mut defs = vec![format!("{} SERIAL PRIMARY KEY", quoted(entity.pk))];
    for c in entity.columns {
        defs.push(column_def(c.name, c.ty.pg_type(), true));
    }
    defs.push("\"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()".to_string());
    defs.push("\"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()".to_string());
    defs.push("\"deleted_at\" TIMESTAMPTZ".to_string());
    for (c, fk) in entity.foreign_keys() {
        defs.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE ON UPDATE CASCADE",
            quoted(c.name),
            quoted(fk.table),
            quoted(fk.column)
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quoted(entity.table),
        defs.join(",\n    ")
    )
}

/// ALTER TABLE … ADD COLUMN IF NOT EXISTS for every column, so tables created by an older
/// model pick up new ones. Added columns are nullable: existing rows have no value for them.
pub fn add_columns_ddl(entity: &EntityDef) -> Vec<String> {
    let table = quoted(entity.table);
    let mut out: Vec<String> = entity
        .columns
        .iter()
        .map(|c| {
            format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {}",
                table,
                column_def(c.name, c.ty.pg_type(), false)
            )
        })
        .collect();
    for stamp in ["created_at", "updated_at"] {
        out.push(format!(
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} TIMESTAMPTZ NOT NULL DEFAULT NOW()",
            table,
            quoted(stamp)
        ));
    }
    out.push(format!("ALTER TABLE {} ADD COLUMN IF NOT EXISTS \"deleted_at\" TIMESTAMPTZ", table));
    out
}

/// Validate the model and bring the database schema up to it. Idempotent.
pub async fn sync_schema(pool: &PgPool) -> Result<(), AppError> {
    validate_model(MODEL)?;
    for entity in MODEL {
        sqlx::query(&create_table_ddl(entity)).execute(pool).await?;
        for ddl in add_columns_ddl(entity) {
            sqlx::query(&ddl).execute(pool).await?;
        }
        tracing::debug!(table = entity.table, "table synced");
    }
    tracing::info!(tables = MODEL.len(), "schema synchronized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, Role, Sale};

    #[test]
    fn create_table_for_root_entity() {
        assert_eq!(
            create_table_ddl(Role::def()),
            "CREATE TABLE IF NOT EXISTS \"roles\" (\n    \
             \"rol_id\" SERIAL PRIMARY KEY,\n    \
             \"nombre_rol\" text NOT NULL,\n    \
             \"descripcion\" text NOT NULL,\n    \
             \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(),\n    \
             \"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(),\n    \
             \"deleted_at\" TIMESTAMPTZ\n)"
        );
    }

    #[test]
    fn foreign_keys_cascade() {
        let ddl = create_table_ddl(Sale::def());
        assert!(ddl.contains("\"fecha\" timestamptz NOT NULL"));
        assert!(ddl.contains(
            "FOREIGN KEY (\"usuario_id\") REFERENCES \"usuarios\" (\"usuario_id\") ON DELETE CASCADE ON UPDATE CASCADE"
        ));
        assert!(ddl.contains(
            "FOREIGN KEY (\"vehiculo_id\") REFERENCES \"vehiculos\" (\"vehiculo_id\") ON DELETE CASCADE ON UPDATE CASCADE"
        ));
    }

    #[test]
    fn added_columns_are_nullable() {
        let ddl = add_columns_ddl(Role::def());
        assert_eq!(ddl[0], "ALTER TABLE \"roles\" ADD COLUMN IF NOT EXISTS \"nombre_rol\" text");
        assert_eq!(ddl.len(), Role::def().columns.len() + 3);
    }
}
