use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coerce::normalize_color;
use crate::{CatalogKind, ModelError, ModelResult};

/// Color stored when a color-bearing kind is submitted without one.
pub const DEFAULT_COLOR: &str = "#CCCCCC";

/// Describes one catalog kind: its backing collection and declared fields.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KindSchema {
    pub kind: CatalogKind,
    /// Collection (table) name. Only ever taken from this registry.
    pub collection: &'static str,
    /// Declared fields in canonical order, excluding `id`.
    pub fields: &'static [FieldDescriptor],
}

/// A declared field of a catalog kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Value applied when the field is not submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl FieldDescriptor {
    const fn new(
        name: &'static str,
        field_type: FieldType,
        required: bool,
        default: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            field_type,
            required,
            default,
        }
    }

    /// Shorthand for a required text field.
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::Text, true, None)
    }

    /// Shorthand for a required positive integer field.
    pub const fn positive_int(name: &'static str) -> Self {
        Self::new(name, FieldType::PositiveInt, true, None)
    }

    /// Shorthand for the `image` field. Never required: the image is resolved
    /// from the upload or form value, falling back to the glyph, and kinds
    /// without a glyph store `""`.
    pub const fn image(default_glyph: Option<&'static str>) -> Self {
        Self::new("image", FieldType::Image, false, default_glyph)
    }

    /// Shorthand for an optional `color` field with a default.
    pub const fn color(default: &'static str) -> Self {
        Self::new("color", FieldType::Color, false, Some(default))
    }
}

/// The storage type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    PositiveInt,
    /// Literal glyph or `uploads/` asset reference, resolved separately.
    Image,
    /// Hex color, always stored with a leading `#`.
    Color,
}

/// A validated scalar ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// JSON form of the value, as returned by the read API.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Int(n) => serde_json::Value::from(*n),
            FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

const TILE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name"),
    FieldDescriptor::image(None),
    FieldDescriptor::positive_int("width"),
    FieldDescriptor::positive_int("height"),
    FieldDescriptor::color(DEFAULT_COLOR),
];

const STORAGE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name"),
    FieldDescriptor::image(Some("📦")),
    FieldDescriptor::positive_int("slots"),
    FieldDescriptor::positive_int("items_per_slot"),
    FieldDescriptor::positive_int("tiles_needed"),
    FieldDescriptor::color(DEFAULT_COLOR),
];

const DECORATION_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name"),
    FieldDescriptor::image(None),
    FieldDescriptor::positive_int("width"),
    FieldDescriptor::positive_int("height"),
    FieldDescriptor::color(DEFAULT_COLOR),
];

const WORKBENCH_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name"),
    FieldDescriptor::image(Some("🔨")),
    FieldDescriptor::positive_int("tiles_needed"),
];

const FURNITURE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name"),
    FieldDescriptor::image(Some("🪑")),
    FieldDescriptor::positive_int("tiles_needed"),
];

const SPECIAL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name"),
    FieldDescriptor::image(Some("⭐")),
    FieldDescriptor::positive_int("tiles_needed"),
];

/// The schema registry, one entry per kind in [`CatalogKind::ALL`] order.
pub static REGISTRY: [KindSchema; 6] = [
    KindSchema {
        kind: CatalogKind::Tile,
        collection: "tiles",
        fields: TILE_FIELDS,
    },
    KindSchema {
        kind: CatalogKind::Storage,
        collection: "storage",
        fields: STORAGE_FIELDS,
    },
    KindSchema {
        kind: CatalogKind::Decoration,
        collection: "decorations",
        fields: DECORATION_FIELDS,
    },
    KindSchema {
        kind: CatalogKind::Workbench,
        collection: "workbench",
        fields: WORKBENCH_FIELDS,
    },
    KindSchema {
        kind: CatalogKind::Furniture,
        collection: "furniture",
        fields: FURNITURE_FIELDS,
    },
    KindSchema {
        kind: CatalogKind::Special,
        collection: "special",
        fields: SPECIAL_FIELDS,
    },
];

/// Looks up the schema for a kind tag.
pub fn schema_for(tag: &str) -> ModelResult<&'static KindSchema> {
    CatalogKind::parse(tag).map(CatalogKind::schema)
}

impl KindSchema {
    /// Returns the declared field with the given name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared column names in canonical order, excluding `id`.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// The image field, if this kind carries one.
    pub fn image_field(&self) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.field_type == FieldType::Image)
    }

    pub fn has_color(&self) -> bool {
        self.fields.iter().any(|f| f.field_type == FieldType::Color)
    }

    /// Glyph stored on create when neither a file nor a literal is given.
    /// Empty for kinds without a documented default.
    pub fn default_image(&self) -> &'static str {
        self.image_field().and_then(|f| f.default).unwrap_or("")
    }

    /// Validates submitted form values against the declared scalar fields.
    ///
    /// Returns `(column, value)` pairs in canonical order. The image field is
    /// skipped (see the image resolver); undeclared inputs are ignored; color
    /// is normalized to carry a leading `#`.
    pub fn validate(
        &self,
        input: &BTreeMap<String, String>,
    ) -> ModelResult<Vec<(&'static str, FieldValue)>> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let raw = input.get(field.name).map(String::as_str);
            let value = match field.field_type {
                FieldType::Image => continue,
                FieldType::Color => {
                    FieldValue::Text(normalize_color(raw, field.default.unwrap_or(DEFAULT_COLOR)))
                }
                FieldType::Text => match non_blank(raw) {
                    Some(text) => FieldValue::Text(text.to_string()),
                    None => match field.default {
                        Some(default) => FieldValue::Text(default.to_string()),
                        None if field.required => return Err(missing(field)),
                        None => continue,
                    },
                },
                FieldType::PositiveInt => match non_blank(raw) {
                    Some(text) => FieldValue::Int(parse_positive(field, text)?),
                    None if field.required => return Err(missing(field)),
                    None => continue,
                },
            };
            values.push((field.name, value));
        }
        Ok(values)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn missing(field: &FieldDescriptor) -> ModelError {
    ModelError::ValidationFailed(format!("missing required field: {}", field.name))
}

fn parse_positive(field: &FieldDescriptor, text: &str) -> ModelResult<i64> {
    match text.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ModelError::ValidationFailed(format!(
            "{} must be a positive integer, got {text:?}",
            field.name
        ))),
    }
}
