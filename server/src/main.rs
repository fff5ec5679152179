//! BaseGrid server
//!
//! Serves the building-block catalog and saved grid layouts to the grid
//! editor over HTTP.
//!
//! Usage:
//!   basegrid-server --port 8080 --database basegrid.db --upload-dir uploads
//!
//! Pass `--seed` on first run to fill empty tile, storage and decoration
//! collections with the reference set.

use std::path::PathBuf;

use anyhow::{Context, Result};
use basegrid_assets::AssetStore;
use basegrid_server::{AppState, ServerConfig, build_router};
use basegrid_storage::{Database, seed_reference_data};
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "basegrid-server")]
#[command(about = "BaseGrid catalog and grid layout server")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Path to the SQLite database file
    #[arg(short, long, default_value = "basegrid.db")]
    database: PathBuf,

    /// Directory for uploaded images
    #[arg(short, long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Largest accepted request body in MiB
    #[arg(long, default_value = "8")]
    max_upload_mb: usize,

    /// Insert reference tiles, storage and decorations into empty collections
    #[arg(long)]
    seed: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("BaseGrid server starting...");

    let db = Database::open(&args.database)
        .with_context(|| format!("Failed to open database {}", args.database.display()))?;
    let assets = AssetStore::open(args.upload_dir.clone())
        .with_context(|| format!("Failed to open upload directory {}", args.upload_dir.display()))?;
    let state = AppState::new(&db, assets);

    if args.seed {
        let added = seed_reference_data(&state.entities).context("Failed to seed reference data")?;
        info!("Reference data: {} records added", added);
    }

    let config = ServerConfig {
        max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
    };
    let app = build_router(state, &config);

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;

    println!("\n========================================");
    println!("  BaseGrid Server Running");
    println!("========================================");
    println!("  Listening:  http://{}", local);
    println!("  Database:   {}", args.database.display());
    println!("  Uploads:    {}", args.upload_dir.display());
    println!("  Max upload: {} MiB", args.max_upload_mb);
    println!("========================================\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("BaseGrid server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
