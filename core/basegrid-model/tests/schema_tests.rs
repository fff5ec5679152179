use basegrid_model::{
    CatalogKind, DEFAULT_COLOR, FieldDescriptor, FieldType, FieldValue, ModelError, REGISTRY,
    schema_for,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Kind tags ────────────────────────────────────────────────────

#[test]
fn parse_singular_tags() {
    assert_eq!(CatalogKind::parse("tile").unwrap(), CatalogKind::Tile);
    assert_eq!(CatalogKind::parse("decoration").unwrap(), CatalogKind::Decoration);
    assert_eq!(CatalogKind::parse("special").unwrap(), CatalogKind::Special);
}

#[test]
fn parse_collection_names() {
    assert_eq!(CatalogKind::parse("tiles").unwrap(), CatalogKind::Tile);
    assert_eq!(CatalogKind::parse("decorations").unwrap(), CatalogKind::Decoration);
    assert_eq!(CatalogKind::parse("storage").unwrap(), CatalogKind::Storage);
}

#[test]
fn parse_is_case_insensitive_and_trims() {
    assert_eq!(CatalogKind::parse("  Furniture ").unwrap(), CatalogKind::Furniture);
    assert_eq!("WORKBENCH".parse::<CatalogKind>().unwrap(), CatalogKind::Workbench);
}

#[test]
fn parse_unknown_tag_fails() {
    let err = CatalogKind::parse("items").unwrap_err();
    assert_eq!(err, ModelError::UnknownKind("items".to_string()));
}

#[test]
fn parse_rejects_injection_attempt() {
    assert!(CatalogKind::parse("tiles; DROP TABLE tiles").is_err());
}

#[test]
fn display_uses_singular_tag() {
    assert_eq!(CatalogKind::Decoration.to_string(), "decoration");
}

#[test]
fn labels_are_capitalized_collections() {
    assert_eq!(CatalogKind::Tile.label(), "Tiles");
    assert_eq!(CatalogKind::Storage.label(), "Storage");
}

// ── Registry shape ───────────────────────────────────────────────

#[test]
fn registry_order_matches_all() {
    for (schema, kind) in REGISTRY.iter().zip(CatalogKind::ALL) {
        assert_eq!(schema.kind, kind);
        assert_eq!(kind.schema().kind, kind);
    }
}

#[test]
fn collection_names_come_from_registry() {
    for schema in &REGISTRY {
        assert_eq!(schema.kind.collection(), schema.collection);
        assert_eq!(CatalogKind::parse(schema.collection).unwrap(), schema.kind);
    }
    let names: Vec<_> = CatalogKind::ALL.into_iter().map(|k| k.collection()).collect();
    assert_eq!(
        names,
        vec!["tiles", "storage", "decorations", "workbench", "furniture", "special"]
    );
}

#[test]
fn schema_for_unknown_fails() {
    assert!(matches!(schema_for("nope"), Err(ModelError::UnknownKind(_))));
}

#[test]
fn tile_columns_in_canonical_order() {
    let cols: Vec<_> = CatalogKind::Tile.schema().columns().collect();
    assert_eq!(cols, vec!["name", "image", "width", "height", "color"]);
}

#[test]
fn storage_columns_in_canonical_order() {
    let cols: Vec<_> = CatalogKind::Storage.schema().columns().collect();
    assert_eq!(
        cols,
        vec!["name", "image", "slots", "items_per_slot", "tiles_needed", "color"]
    );
}

#[test]
fn default_glyphs() {
    assert_eq!(CatalogKind::Tile.schema().default_image(), "");
    assert_eq!(CatalogKind::Decoration.schema().default_image(), "");
    assert_eq!(CatalogKind::Storage.schema().default_image(), "📦");
    assert_eq!(CatalogKind::Workbench.schema().default_image(), "🔨");
    assert_eq!(CatalogKind::Furniture.schema().default_image(), "🪑");
    assert_eq!(CatalogKind::Special.schema().default_image(), "⭐");
}

#[test]
fn color_only_on_tile_storage_decoration() {
    let with_color: Vec<_> = CatalogKind::ALL
        .into_iter()
        .filter(|k| k.schema().has_color())
        .collect();
    assert_eq!(
        with_color,
        vec![CatalogKind::Tile, CatalogKind::Storage, CatalogKind::Decoration]
    );
}

#[test]
fn image_descriptor_is_optional() {
    let f = FieldDescriptor::image(None);
    assert_eq!(f.field_type, FieldType::Image);
    assert!(!f.required);
    assert_eq!(f.default, None);

    let f = FieldDescriptor::image(Some("🔨"));
    assert!(!f.required);
    assert_eq!(f.default, Some("🔨"));
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn validate_tile_normalizes_color() {
    let values = CatalogKind::Tile
        .schema()
        .validate(&form(&[
            ("name", "Grass"),
            ("width", "1"),
            ("height", "2"),
            ("color", "CCCCCC"),
        ]))
        .unwrap();
    assert_eq!(
        values,
        vec![
            ("name", FieldValue::Text("Grass".into())),
            ("width", FieldValue::Int(1)),
            ("height", FieldValue::Int(2)),
            ("color", FieldValue::Text("#CCCCCC".into())),
        ]
    );
}

#[test]
fn validate_applies_default_color() {
    let values = CatalogKind::Decoration
        .schema()
        .validate(&form(&[("name", "Tree"), ("width", "2"), ("height", "2")]))
        .unwrap();
    assert_eq!(values.last().unwrap().1, FieldValue::Text(DEFAULT_COLOR.into()));
}

#[test]
fn validate_missing_required_field() {
    let err = CatalogKind::Storage
        .schema()
        .validate(&form(&[("name", "Chest"), ("slots", "3"), ("items_per_slot", "20")]))
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::ValidationFailed("missing required field: tiles_needed".into())
    );
}

#[test]
fn validate_blank_name_is_missing() {
    let err = CatalogKind::Special
        .schema()
        .validate(&form(&[("name", "   "), ("tiles_needed", "1")]))
        .unwrap_err();
    assert!(matches!(err, ModelError::ValidationFailed(msg) if msg.contains("name")));
}

#[test]
fn validate_non_numeric_width() {
    let err = CatalogKind::Tile
        .schema()
        .validate(&form(&[("name", "Stone"), ("width", "wide"), ("height", "1")]))
        .unwrap_err();
    assert!(matches!(err, ModelError::ValidationFailed(msg) if msg.contains("width")));
}

#[test]
fn validate_rejects_zero_and_negative() {
    let schema = CatalogKind::Workbench.schema();
    assert!(schema.validate(&form(&[("name", "Bench"), ("tiles_needed", "0")])).is_err());
    assert!(schema.validate(&form(&[("name", "Bench"), ("tiles_needed", "-2")])).is_err());
}

#[test]
fn validate_ignores_undeclared_fields() {
    let values = CatalogKind::Furniture
        .schema()
        .validate(&form(&[
            ("name", "Chair"),
            ("tiles_needed", "1"),
            ("color", "ff0000"),
            ("width", "3"),
        ]))
        .unwrap();
    let cols: Vec<_> = values.iter().map(|(c, _)| *c).collect();
    assert_eq!(cols, vec!["name", "tiles_needed"]);
}

#[test]
fn validate_skips_image_field() {
    let values = CatalogKind::Workbench
        .schema()
        .validate(&form(&[("name", "Bench"), ("image", "🛠"), ("tiles_needed", "2")]))
        .unwrap();
    assert!(values.iter().all(|(c, _)| *c != "image"));
}

#[test]
fn field_value_json() {
    assert_eq!(FieldValue::Int(3).to_json(), serde_json::json!(3));
    assert_eq!(FieldValue::Text("a".into()).to_json(), serde_json::json!("a"));
}
