use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{coerce_int, coerce_item_type};
use crate::CatalogKind;

/// Grid id used when a request does not name one.
pub const DEFAULT_GRID_ID: i64 = 1;

/// Kind tag stored for placements submitted without one.
pub const UNKNOWN_ITEM_TYPE: &str = "unknown";

/// A stored catalog row, projected to its kind's declared columns.
///
/// `data` holds `id` followed by the kind's fields in canonical order and is
/// what the read API returns to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: i64,
    pub kind: CatalogKind,
    pub data: Map<String, Value>,
    pub created_at: i64,
}

impl CatalogRecord {
    /// Extract a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Extract an integer field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.data.get(field).and_then(Value::as_i64)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn image(&self) -> Option<&str> {
        self.get_str("image")
    }

    pub fn color(&self) -> Option<&str> {
        self.get_str("color")
    }
}

/// One catalog item positioned on a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: i64,
    pub grid_id: i64,
    pub item_id: i64,
    /// Kind tag of the referenced item. Not checked against the catalog.
    pub item_type: String,
    pub x: i64,
    pub y: i64,
    /// Unix milliseconds.
    pub created_at: i64,
}

/// A placement submitted as part of a grid save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlacement {
    pub item_id: i64,
    pub item_type: String,
    pub x: i64,
    pub y: i64,
}

impl NewPlacement {
    pub fn new(item_id: i64, item_type: impl Into<String>, x: i64, y: i64) -> Self {
        Self {
            item_id,
            item_type: item_type.into(),
            x,
            y,
        }
    }

    /// Builds a placement from an untrusted JSON entry
    /// (`{"itemId", "itemType", "x", "y"}`), coercing every field instead of
    /// rejecting the entry.
    pub fn from_json(entry: &Value) -> Self {
        let int_field = |key: &str| entry.get(key).map(coerce_int).unwrap_or(0);
        Self {
            item_id: int_field("itemId"),
            item_type: coerce_item_type(entry.get("itemType")),
            x: int_field("x"),
            y: int_field("y"),
        }
    }
}
