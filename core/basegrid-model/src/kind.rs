use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::{KindSchema, REGISTRY};
use crate::{ModelError, ModelResult};

/// The catalog kinds a grid placement can reference.
///
/// Each kind owns an independent collection (its own table and id space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Tile,
    Storage,
    Decoration,
    Workbench,
    Furniture,
    Special,
}

impl CatalogKind {
    /// Every kind, in registry order.
    pub const ALL: [CatalogKind; 6] = [
        CatalogKind::Tile,
        CatalogKind::Storage,
        CatalogKind::Decoration,
        CatalogKind::Workbench,
        CatalogKind::Furniture,
        CatalogKind::Special,
    ];

    /// The singular kind tag (e.g. `"tile"`).
    pub const fn tag(self) -> &'static str {
        match self {
            CatalogKind::Tile => "tile",
            CatalogKind::Storage => "storage",
            CatalogKind::Decoration => "decoration",
            CatalogKind::Workbench => "workbench",
            CatalogKind::Furniture => "furniture",
            CatalogKind::Special => "special",
        }
    }

    /// The collection name backing this kind (e.g. `"tiles"`), as declared
    /// in the registry.
    pub fn collection(self) -> &'static str {
        self.schema().collection
    }

    /// Capitalized collection name used in user-facing messages.
    pub const fn label(self) -> &'static str {
        match self {
            CatalogKind::Tile => "Tiles",
            CatalogKind::Storage => "Storage",
            CatalogKind::Decoration => "Decorations",
            CatalogKind::Workbench => "Workbench",
            CatalogKind::Furniture => "Furniture",
            CatalogKind::Special => "Special",
        }
    }

    /// The registry entry for this kind.
    pub fn schema(self) -> &'static KindSchema {
        // REGISTRY is declared in ALL order.
        &REGISTRY[self as usize]
    }

    /// Parses a kind tag. Accepts the singular tag or the collection name,
    /// case-insensitively and ignoring surrounding whitespace.
    pub fn parse(tag: &str) -> ModelResult<Self> {
        let normalized = tag.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.tag() == normalized || k.collection() == normalized)
            .ok_or_else(|| ModelError::UnknownKind(tag.to_string()))
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CatalogKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
