//! Table definitions.
//!
//! Catalog tables are generated from the schema registry so that a new kind
//! only needs a registry entry.

use basegrid_model::{FieldType, KindSchema, REGISTRY};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::StorageResult;

const GRID_ITEMS_DDL: &str = "
    CREATE TABLE IF NOT EXISTS grid_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        grid_id INTEGER NOT NULL DEFAULT 1,
        item_id INTEGER NOT NULL,
        item_type TEXT NOT NULL,
        x INTEGER NOT NULL,
        y INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_grid_items_grid_id ON grid_items (grid_id);
";

/// Creates every catalog table and `grid_items` if missing.
pub fn init_schema(conn: &Connection) -> StorageResult<()> {
    let mut ddl = String::new();
    for schema in &REGISTRY {
        ddl.push_str(&catalog_table_ddl(schema));
    }
    ddl.push_str(GRID_ITEMS_DDL);
    conn.execute_batch(&ddl)?;
    debug!("Schema initialized ({} catalog tables)", REGISTRY.len());
    Ok(())
}

/// Returns true if a table with this name exists.
pub fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn catalog_table_ddl(schema: &KindSchema) -> String {
    let mut columns = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    for field in schema.fields {
        let definition = match field.field_type {
            FieldType::Text => format!("{} TEXT NOT NULL", field.name),
            FieldType::PositiveInt => {
                format!("{0} INTEGER NOT NULL CHECK ({0} > 0)", field.name)
            }
            FieldType::Image | FieldType::Color => format!(
                "{} TEXT NOT NULL DEFAULT '{}'",
                field.name,
                sql_quote(field.default.unwrap_or(""))
            ),
        };
        columns.push(definition);
    }
    columns.push("created_at INTEGER NOT NULL DEFAULT 0".to_string());

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);\n",
        schema.collection,
        columns.join(",\n    ")
    )
}

fn sql_quote(value: &str) -> String {
    value.replace('\'', "''")
}
