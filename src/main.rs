//! Clario API Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Looks for a TOML config file (`~/.config/clario/config.toml`,
//! `/etc/clario/config.toml`, or `./config.toml`), then applies
//! environment overrides:
//!
//! - `CLARIO_DATA_DIR`: Data directory (default: platform data dir)
//! - `CLARIO_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `CLARIO_API_PORT`: Port to listen on (default: 5000)
//! - `CLARIO_LOG_LEVEL`: Log level (default: info)
//! - `RUST_LOG`: Full tracing filter, takes precedence over CLARIO_LOG_LEVEL
//!
//! Command-line flags override both.

use clap::Parser;
use clario::api::{serve, AppState};
use clario::clock::SystemClock;
use clario::config::Config;
use clario::store::RecordStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "clario", version, about = "Clario personal productivity server")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory for the database file
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("clario={},tower_http=debug", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Clario API server v{}", env!("CARGO_PKG_VERSION"));

    let db_path = config.storage.database_path();
    tracing::info!("Database: {:?}", db_path);

    let store = Arc::new(RecordStore::open(&db_path)?);
    let state = AppState::new(store, Arc::new(SystemClock), config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("Clario API server stopped");
    Ok(())
}
