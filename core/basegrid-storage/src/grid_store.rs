//! Grid layout persistence.
//!
//! A grid's placements are replaced as a whole: save deletes every row for
//! the grid id and inserts the submitted list inside one transaction, so
//! readers never observe the intermediate empty state.

use basegrid_model::{NewPlacement, PlacementRecord};
use rusqlite::params;
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};
use crate::schema::table_exists;
use crate::{SharedConnection, lock, now_millis};

/// Table holding every placement.
pub const GRID_TABLE: &str = "grid_items";

/// Placement store over the shared connection.
#[derive(Clone)]
pub struct GridStore {
    conn: SharedConnection,
}

impl GridStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Placements for a grid in creation order. Empty if the table has not
    /// been created yet.
    pub fn load(&self, grid_id: i64) -> StorageResult<Vec<PlacementRecord>> {
        let conn = lock(&self.conn)?;
        if !table_exists(&conn, GRID_TABLE)? {
            debug!("{} does not exist yet; grid {} is empty", GRID_TABLE, grid_id);
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(
            "SELECT id, grid_id, item_id, item_type, x, y, created_at
             FROM grid_items WHERE grid_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![grid_id], |row| {
            Ok(PlacementRecord {
                id: row.get(0)?,
                grid_id: row.get(1)?,
                item_id: row.get(2)?,
                item_type: row.get(3)?,
                x: row.get(4)?,
                y: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut placements = Vec::new();
        for row in rows {
            placements.push(row?);
        }
        Ok(placements)
    }

    /// Replaces the grid's placements with `placements`.
    ///
    /// Returns how many rows were inserted. A row that fails to insert is
    /// logged and skipped; the others are still committed.
    pub fn save(&self, grid_id: i64, placements: &[NewPlacement]) -> StorageResult<usize> {
        let mut conn = lock(&self.conn)?;
        ensure_table(&conn)?;

        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM grid_items WHERE grid_id = ?1", params![grid_id])?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO grid_items (grid_id, item_id, item_type, x, y, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let created_at = now_millis();
            for p in placements {
                match stmt.execute(params![grid_id, p.item_id, p.item_type, p.x, p.y, created_at]) {
                    Ok(_) => inserted += 1,
                    Err(e) => warn!(
                        "Failed to insert placement of {} #{} at ({}, {}) on grid {}: {}",
                        p.item_type, p.item_id, p.x, p.y, grid_id, e
                    ),
                }
            }
        }
        tx.commit()?;

        info!(
            "Saved grid {}: replaced {} placements with {} of {}",
            grid_id,
            removed,
            inserted,
            placements.len()
        );
        Ok(inserted)
    }

    /// Removes every placement for the grid and returns how many were removed.
    pub fn clear(&self, grid_id: i64) -> StorageResult<usize> {
        let conn = lock(&self.conn)?;
        ensure_table(&conn)?;
        let removed = conn.execute("DELETE FROM grid_items WHERE grid_id = ?1", params![grid_id])?;
        info!("Cleared grid {} ({} placements)", grid_id, removed);
        Ok(removed)
    }
}

fn ensure_table(conn: &rusqlite::Connection) -> StorageResult<()> {
    if table_exists(conn, GRID_TABLE)? {
        Ok(())
    } else {
        Err(StorageError::Storage(format!(
            "table {GRID_TABLE} does not exist; initialize the database first"
        )))
    }
}
