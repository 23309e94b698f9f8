//! # Skyferry Server
//!
//! Binary entry point: loads configuration, connects Postgres and object
//! storage, applies migrations and serves the REST API.

use clap::Parser;
use skyferry_api::{build_router, AppState};
use skyferry_db::{storage::StorageClient, Database};
use std::net::SocketAddr;

#[derive(Debug, Parser)]
#[command(name = "skyferry", version, about = "Ferry flight permit and workflow service")]
struct Args {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, env = "SKYFERRY_LOG_JSON")]
    log_json: bool,

    /// Apply database migrations and exit
    #[arg(long)]
    migrate_only: bool,

    /// Do not check for (or create) the document bucket on startup
    #[arg(long)]
    skip_bucket_check: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "skyferry_server=debug,skyferry_api=debug,skyferry_db=debug,tower_http=debug".into());

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = skyferry_common::config::init()?;

    init_tracing(args.log_json);

    tracing::info!("Starting Skyferry v{}", env!("CARGO_PKG_VERSION"));

    let db = Database::connect(config).await?;
    db.migrate().await?;

    if args.migrate_only {
        tracing::info!("Migrations applied, exiting");
        return Ok(());
    }

    // === Object Storage (MinIO / S3) ===
    let storage = StorageClient::new(&config.storage);
    if !args.skip_bucket_check {
        storage.ensure_bucket().await?;
    }
    tracing::info!(bucket = %config.storage.bucket, "Object storage ready");

    let router = build_router(AppState { db, storage });
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
