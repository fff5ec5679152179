use serde_json::{Map, Value};

use crate::KindSchema;

/// Projects a raw stored row onto the kind's declared columns.
///
/// The result always holds `id` followed by every declared field in
/// canonical order. Columns the store carries beyond the declaration are
/// dropped; declared columns the row lacks come back as `null`, so every
/// record of a kind has the same shape.
pub fn project(schema: &KindSchema, raw: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(schema.fields.len() + 1);
    out.insert("id".to_string(), raw.get("id").cloned().unwrap_or(Value::Null));
    for column in schema.columns() {
        out.insert(
            column.to_string(),
            raw.get(column).cloned().unwrap_or(Value::Null),
        );
    }
    out
}
