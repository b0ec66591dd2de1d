//! haiku-validator - 5-7-5 structure validation microservice

use anyhow::Result;
use clap::Parser;
use haiku_common::config::{default_config_path, init_tracing, load_toml_config};
use haiku_common::shutdown::wait_for_signal;
use haiku_validator::config::TomlConfig;
use haiku_validator::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for haiku-validator
#[derive(Parser, Debug)]
#[command(name = "haiku-validator")]
#[command(about = "Haiku structure validation microservice")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HAIKU_VALIDATOR_PORT")]
    port: Option<u16>,

    /// TOML config file (default: ~/.config/haiku/haiku-validator.toml)
    #[arg(short, long, env = "HAIKU_VALIDATOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("haiku-validator"));
    let (toml, config_source): (TomlConfig, _) = load_toml_config(config_path.as_deref())?;
    init_tracing(&toml.logging)?;

    info!("Starting haiku-validator v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();

    let app = build_router(AppState::new());

    let addr = format!("127.0.0.1:{}", toml.resolve_port(args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal(tokio::signal::ctrl_c()))
        .await?;

    info!("haiku-validator stopped");
    Ok(())
}
