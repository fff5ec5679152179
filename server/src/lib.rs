//! HTTP API for BaseGrid.
//!
//! Serves the entity catalog, grid layouts and uploaded image assets over
//! JSON. Every store call runs on the blocking pool; handlers never return
//! a transport-level error for a failed operation, only a JSON body with a
//! status code.

mod assets;
mod catalog;
mod grid;
mod response;

pub use response::{CatalogResponse, GridLoadResponse, GridWriteResponse};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use basegrid_assets::AssetStore;
use basegrid_storage::{Database, EntityStore, GridStore, StorageResult};

/// Upload bound applied when none is configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Router settings that do not come from the database.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Largest accepted request body, uploads included.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Stores shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub entities: EntityStore,
    pub grids: GridStore,
}

impl AppState {
    pub fn new(db: &Database, assets: AssetStore) -> Self {
        Self {
            entities: db.entity_store(assets),
            grids: db.grid_store(),
        }
    }
}

/// Build the HTTP API router over the given stores.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/api/catalog/{kind}",
            get(catalog::list_handler).post(catalog::add_handler),
        )
        .route(
            "/api/catalog/{kind}/{id}",
            post(catalog::update_handler)
                .put(catalog::update_handler)
                .delete(catalog::delete_handler),
        )
        .route("/api/items", get(catalog::items_handler))
        .route(
            "/api/grid",
            get(grid::load_handler)
                .post(grid::save_handler)
                .delete(grid::clear_handler),
        )
        .route("/uploads/{file}", get(assets::serve_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}

/// Runs a store operation on the blocking pool.
pub(crate) async fn run_blocking<T, F>(op: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(response::task_failed)?
}
