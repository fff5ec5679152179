use basegrid_model::{
    CatalogKind, CatalogRecord, NewPlacement, UNKNOWN_ITEM_TYPE, coerce_int, normalize_color,
    parse_leading_int, project,
};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

fn as_map(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

// ── Projection ───────────────────────────────────────────────────

#[test]
fn projection_drops_extra_columns() {
    let raw = as_map(json!({
        "id": 7,
        "name": "Chair",
        "image": "🪑",
        "tiles_needed": 1,
        "created_at": 123,
        "legacy_column": "x"
    }));
    let out = project(CatalogKind::Furniture.schema(), &raw);
    let keys: Vec<_> = out.keys().cloned().collect();
    assert_eq!(keys, vec!["id", "name", "image", "tiles_needed"]);
}

#[test]
fn projection_fills_missing_columns_with_null() {
    let raw = as_map(json!({"id": 1, "name": "Chest", "slots": 3}));
    let out = project(CatalogKind::Storage.schema(), &raw);
    assert_eq!(out.len(), 7);
    assert_eq!(out["color"], Value::Null);
    assert_eq!(out["slots"], json!(3));
}

#[test]
fn projection_canonical_order_ignores_raw_order() {
    let raw = as_map(json!({
        "color": "#FFFFFF", "height": 1, "width": 1, "image": "🌿", "name": "Grass", "id": 2
    }));
    let out = project(CatalogKind::Tile.schema(), &raw);
    let keys: Vec<_> = out.keys().cloned().collect();
    assert_eq!(keys, vec!["id", "name", "image", "width", "height", "color"]);
}

// ── CatalogRecord accessors ──────────────────────────────────────

#[test]
fn record_accessors() {
    let record = CatalogRecord {
        id: 4,
        kind: CatalogKind::Tile,
        data: as_map(json!({
            "id": 4,
            "name": "Water",
            "image": "💧",
            "width": 1,
            "color": "#0000FF",
        })),
        created_at: 1000,
    };
    assert_eq!(record.name(), Some("Water"));
    assert_eq!(record.image(), Some("💧"));
    assert_eq!(record.color(), Some("#0000FF"));
    assert_eq!(record.get_i64("width"), Some(1));
    assert_eq!(record.get_str("width"), None);
    assert_eq!(record.get_str("missing"), None);
}

// ── Placement coercion ───────────────────────────────────────────

#[test]
fn placement_from_complete_entry() {
    let p = NewPlacement::from_json(&json!({"itemId": 5, "itemType": "tile", "x": 3, "y": 4}));
    assert_eq!(p, NewPlacement::new(5, "tile", 3, 4));
}

#[test]
fn placement_missing_coordinates_default_to_zero() {
    let p = NewPlacement::from_json(&json!({"itemId": 9, "itemType": "storage"}));
    assert_eq!(p, NewPlacement::new(9, "storage", 0, 0));
}

#[test]
fn placement_missing_type_is_unknown() {
    let p = NewPlacement::from_json(&json!({"itemId": 1, "x": 1, "y": 1}));
    assert_eq!(p.item_type, UNKNOWN_ITEM_TYPE);

    let p = NewPlacement::from_json(&json!({"itemType": "", "x": 1}));
    assert_eq!(p.item_type, UNKNOWN_ITEM_TYPE);
}

#[test]
fn placement_string_numbers_are_coerced() {
    let raw = json!({"itemId": "12", "itemType": "tile", "x": "7px", "y": "abc"});
    let p = NewPlacement::from_json(&raw);
    assert_eq!(p, NewPlacement::new(12, "tile", 7, 0));
}

#[test]
fn placement_non_object_entry() {
    let p = NewPlacement::from_json(&json!("garbage"));
    assert_eq!(p, NewPlacement::new(0, UNKNOWN_ITEM_TYPE, 0, 0));
}

#[test]
fn coerce_int_variants() {
    assert_eq!(coerce_int(&json!(4)), 4);
    assert_eq!(coerce_int(&json!(4.9)), 4);
    assert_eq!(coerce_int(&json!(-2.5)), -2);
    assert_eq!(coerce_int(&json!(true)), 1);
    assert_eq!(coerce_int(&json!(null)), 0);
    assert_eq!(coerce_int(&json!([1, 2])), 0);
    assert_eq!(coerce_int(&json!({"a": 1})), 0);
}

#[test]
fn parse_leading_int_variants() {
    assert_eq!(parse_leading_int("42"), 42);
    assert_eq!(parse_leading_int("  -8 tiles"), -8);
    assert_eq!(parse_leading_int("+3"), 3);
    assert_eq!(parse_leading_int(""), 0);
    assert_eq!(parse_leading_int("x1"), 0);
    assert_eq!(parse_leading_int("99999999999999999999999"), i64::MAX);
}

// ── Color normalization ──────────────────────────────────────────

#[test]
fn color_gets_hash_prefix() {
    assert_eq!(normalize_color(Some("CCCCCC"), "#000000"), "#CCCCCC");
    assert_eq!(normalize_color(Some("#abcdef"), "#000000"), "#abcdef");
    assert_eq!(normalize_color(Some(" 112233 "), "#000000"), "#112233");
}

#[test]
fn blank_color_uses_default() {
    assert_eq!(normalize_color(None, "#CCCCCC"), "#CCCCCC");
    assert_eq!(normalize_color(Some(""), "#CCCCCC"), "#CCCCCC");
}
