//! SQLite storage layer for BaseGrid.
//!
//! Persists the entity catalog and grid layouts in a single SQLite file.
//!
//! # Architecture
//!
//! - One table per catalog kind, with DDL derived from the schema registry
//! - `grid_items` holds placements, grouped by grid id
//! - [`Database`] owns the shared connection and hands out [`EntityStore`]
//!   and [`GridStore`] views over it
//! - Schema bootstrap is idempotent and runs on [`Database::open`]
//!
//! Operations hold the connection lock only while talking to SQLite. Multi-step
//! sequences (existence check, image upload, write) are not isolated from
//! each other; see the individual stores for the consequences.

mod entity_store;
mod error;
mod grid_store;
mod schema;
mod seed;

pub use entity_store::{
    EntityStore, FieldCheck, Submission, UpdateOutcome, Verification, WriteOutcome,
};
pub use error::{ErrorKind, StorageError, StorageResult};
pub use grid_store::{GRID_TABLE, GridStore};
pub use schema::{init_schema, table_exists};
pub use seed::seed_reference_data;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use basegrid_assets::AssetStore;
use rusqlite::Connection;

/// Connection shared by every store opened from the same [`Database`].
pub type SharedConnection = Arc<Mutex<Connection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the BaseGrid database.
#[derive(Clone)]
pub struct Database {
    conn: SharedConnection,
}

impl Database {
    /// Opens (or creates) the database at the given path and bootstraps its schema.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self::attach(conn);
        db.init_schema()?;
        Ok(db)
    }

    /// Opens an in-memory database with the schema in place (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Self::attach(Connection::open_in_memory()?);
        db.init_schema()?;
        Ok(db)
    }

    /// Wraps an existing connection as-is. The caller owns schema setup.
    pub fn attach(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Creates any missing tables. Safe to run repeatedly.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = lock(&self.conn)?;
        init_schema(&conn)
    }

    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    /// Catalog CRUD over this database, storing uploads in `assets`.
    pub fn entity_store(&self, assets: AssetStore) -> EntityStore {
        EntityStore::new(self.connection(), assets)
    }

    pub fn grid_store(&self) -> GridStore {
        GridStore::new(self.connection())
    }
}

pub(crate) fn lock(conn: &SharedConnection) -> StorageResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StorageError::Storage("connection lock poisoned".to_string()))
}

/// Current time in unix milliseconds, used for `created_at`.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
