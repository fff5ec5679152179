//! Reference catalog data for fresh databases.

use basegrid_model::CatalogKind;
use tracing::info;

use crate::entity_store::{EntityStore, Submission};
use crate::error::StorageResult;

const TILES: &[(&str, &str, u32, u32)] = &[
    ("Grass", "🌿", 1, 1),
    ("Stone", "🪨", 1, 1),
    ("Wood", "🪵", 1, 1),
    ("Dirt", "🟫", 1, 1),
    ("Water", "💧", 1, 1),
];

/// (name, slots, items_per_slot, tiles_needed)
const STORAGE: &[(&str, u32, u32, u32)] = &[
    ("Small Chest", 3, 20, 1),
    ("Medium Chest", 6, 20, 2),
    ("Large Chest", 9, 30, 4),
    ("Storage Rack", 12, 40, 6),
];

const DECORATIONS: &[(&str, &str, u32, u32)] = &[
    ("Flower", "🌸", 1, 1),
    ("Tree", "🌳", 2, 2),
    ("Rock", "🪨", 1, 1),
    ("Fence", "🧱", 3, 1),
];

/// Inserts the reference tiles, storage containers and decorations into
/// whichever of those collections are empty. Returns the number of records
/// added; populated collections are left alone.
pub fn seed_reference_data(store: &EntityStore) -> StorageResult<usize> {
    let mut added = 0;

    if store.count(CatalogKind::Tile)? == 0 {
        for &(name, image, width, height) in TILES {
            store.add(CatalogKind::Tile, &sized(name, image, width, height))?;
            added += 1;
        }
    }

    if store.count(CatalogKind::Storage)? == 0 {
        for &(name, slots, per_slot, tiles) in STORAGE {
            let submission = Submission::new()
                .field("name", name)
                .field("slots", slots.to_string())
                .field("items_per_slot", per_slot.to_string())
                .field("tiles_needed", tiles.to_string());
            store.add(CatalogKind::Storage, &submission)?;
            added += 1;
        }
    }

    if store.count(CatalogKind::Decoration)? == 0 {
        for &(name, image, width, height) in DECORATIONS {
            store.add(CatalogKind::Decoration, &sized(name, image, width, height))?;
            added += 1;
        }
    }

    info!("Seeded {} reference records", added);
    Ok(added)
}

fn sized(name: &str, image: &str, width: u32, height: u32) -> Submission {
    Submission::new()
        .field("name", name)
        .field("image", image)
        .field("width", width.to_string())
        .field("height", height.to_string())
}
