//! haiku-pipeline - generation/validation/persistence orchestrator
//!
//! Serves `POST /api/generate` on port 8000 by default. Ctrl-C cancels
//! in-flight runs at their next attempt boundary, then stops the server.

use anyhow::{Context, Result};
use clap::Parser;
use haiku_common::config::{default_config_path, init_tracing, load_toml_config};
use haiku_common::shutdown::wait_for_signal;
use haiku_pipeline::clients::{HttpGenerator, HttpHaikuStore, HttpValidator};
use haiku_pipeline::config::{Overrides, PipelineConfig, TomlConfig};
use haiku_pipeline::{build_router, AppState, HaikuValidator, LocalValidator, PipelineOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Command-line arguments for haiku-pipeline
#[derive(Parser, Debug)]
#[command(name = "haiku-pipeline")]
#[command(about = "Haiku generation pipeline")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HAIKU_PIPELINE_PORT")]
    port: Option<u16>,

    /// Generator endpoint (full URL)
    #[arg(long, env = "HAIKU_GENERATOR_URL")]
    generator_url: Option<String>,

    /// haiku-store base URL
    #[arg(long, env = "HAIKU_STORE_URL")]
    store_url: Option<String>,

    /// haiku-validator base URL; validates in-process when omitted
    #[arg(long, env = "HAIKU_VALIDATOR_URL")]
    validator_url: Option<String>,

    /// Default attempts per run
    #[arg(short, long, env = "HAIKU_PIPELINE_MAX_ATTEMPTS")]
    max_attempts: Option<u32>,

    /// TOML config file (default: ~/.config/haiku/haiku-pipeline.toml)
    #[arg(short, long, env = "HAIKU_PIPELINE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("haiku-pipeline"));
    let (toml, config_source): (TomlConfig, _) = load_toml_config(config_path.as_deref())?;
    init_tracing(&toml.logging)?;

    info!("Starting haiku-pipeline v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();

    let config = PipelineConfig::resolve(
        Overrides {
            port: args.port,
            generator_url: args.generator_url,
            store_url: args.store_url,
            validator_url: args.validator_url,
            max_attempts: args.max_attempts,
        },
        &toml,
    );
    info!("Generator: {}", config.generator_url);
    info!("Store: {}", config.store_url);

    let generator = HttpGenerator::new(config.generator_url.clone(), config.timeouts.generator)
        .context("Failed to create generator client")?;
    let store = HttpHaikuStore::new(config.store_url.clone(), config.timeouts.store)
        .context("Failed to create store client")?;
    let validator: Arc<dyn HaikuValidator> = match &config.validator_url {
        Some(url) => {
            info!("Validator: {}", url);
            Arc::new(
                HttpValidator::new(url, config.timeouts.validator)
                    .context("Failed to create validator client")?,
            )
        }
        None => {
            info!("Validator: in-process");
            Arc::new(LocalValidator)
        }
    };

    let orchestrator = PipelineOrchestrator::new(Arc::new(generator), validator, Arc::new(store))
        .with_timeouts(config.timeouts);
    let state = AppState::new(orchestrator, config.default_max_attempts);
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("haiku-pipeline stopped");
    Ok(())
}

/// Wait for Ctrl-C, then cancel all runs so graceful shutdown can drain
async fn shutdown_signal(shutdown: CancellationToken) {
    wait_for_signal(tokio::signal::ctrl_c()).await;
    info!("Cancelling pipeline runs");
    shutdown.cancel();
}
