#![allow(dead_code)]

use std::path::PathBuf;

use basegrid_assets::AssetStore;
use basegrid_server::{AppState, ServerConfig, build_router};
use basegrid_storage::Database;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDRfake-png-body";
pub const TEXT: &[u8] = b"definitely not an image";

pub struct TestServer {
    pub base: String,
    pub upload_dir: PathBuf,
    _dir: tempfile::TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn stored_uploads(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).unwrap().count()
    }
}

/// Spin up the HTTP server on an OS-assigned port over a fresh database.
pub async fn spawn_test_server() -> TestServer {
    spawn_with_config(ServerConfig::default()).await
}

pub async fn spawn_with_config(config: ServerConfig) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let upload_dir = dir.path().join("uploads");
    let db = Database::open(&dir.path().join("basegrid.db")).unwrap();
    let assets = AssetStore::open(upload_dir.clone()).unwrap();
    let app = build_router(AppState::new(&db, assets), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        upload_dir,
        _dir: dir,
    }
}
