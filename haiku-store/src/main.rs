//! haiku-store - durable haiku persistence microservice
//!
//! Exposes create/read/list/search/delete over HTTP on port 8075 by default.

use anyhow::{Context, Result};
use clap::Parser;
use haiku_common::config::{default_config_path, init_tracing, load_toml_config};
use haiku_common::shutdown::wait_for_signal;
use haiku_store::config::{Overrides, StoreConfig, TomlConfig};
use haiku_store::{build_router, db, AppState, SqliteHaikuStore};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for haiku-store
#[derive(Parser, Debug)]
#[command(name = "haiku-store")]
#[command(about = "Haiku persistence microservice")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HAIKU_STORE_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "HAIKU_STORE_DB")]
    database: Option<PathBuf>,

    /// TOML config file (default: ~/.config/haiku/haiku-store.toml)
    #[arg(short, long, env = "HAIKU_STORE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("haiku-store"));
    let (toml, config_source): (TomlConfig, _) = load_toml_config(config_path.as_deref())?;
    init_tracing(&toml.logging)?;

    info!("Starting haiku-store v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();

    let config = StoreConfig::resolve(
        Overrides {
            port: args.port,
            database_path: args.database,
        },
        &toml,
    );
    info!("Database: {}", config.database_path.display());

    let pool = db::init_database_pool(&config.database_path, config.pool)
        .await
        .context("Failed to open haiku database")?;
    info!("Database connection established");

    let state = AppState::new(SqliteHaikuStore::new(pool));
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal(tokio::signal::ctrl_c()))
        .await?;

    info!("haiku-store stopped");
    Ok(())
}
