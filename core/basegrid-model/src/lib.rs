//! Catalog model for BaseGrid.
//!
//! Defines the types every other BaseGrid crate depends on:
//! - [`CatalogKind`]: the six placeable entity kinds and their kind tags
//! - [`KindSchema`]: the registry entry describing a kind's columns and defaults
//! - [`CatalogRecord`] / [`PlacementRecord`]: stored catalog rows and grid placements
//! - [`project`]: per-kind column projection for the read API
//!
//! Nothing in this crate performs I/O. Storage and upload handling consult
//! the registry through [`schema_for`] or [`CatalogKind::schema`].

mod coerce;
mod kind;
mod projection;
mod record;
mod schema;

pub use coerce::{coerce_int, coerce_item_type, normalize_color, parse_leading_int};
pub use kind::CatalogKind;
pub use projection::project;
pub use record::{CatalogRecord, DEFAULT_GRID_ID, NewPlacement, PlacementRecord, UNKNOWN_ITEM_TYPE};
pub use schema::{
    DEFAULT_COLOR, FieldDescriptor, FieldType, FieldValue, KindSchema, REGISTRY, schema_for,
};

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while resolving kinds or validating submitted fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The kind tag is not one of the registered catalog kinds.
    #[error("unknown catalog kind: {0}")]
    UnknownKind(String),

    /// A required field is missing or could not be coerced to its type.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}
