//! haiku-pipeline configuration
//!
//! TOML bootstrap merged under command-line/environment overrides.

use haiku_common::config::LoggingConfig;
use haiku_common::time::millis_to_duration;
use serde::Deserialize;

use crate::orchestrator::Timeouts;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Attempts per run when neither request nor config says
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

pub const DEFAULT_GENERATOR_URL: &str = "http://127.0.0.1:8010/api/generate";
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8075";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub generator_url: Option<String>,
    #[serde(default)]
    pub store_url: Option<String>,
    /// Remote validator base URL; validation runs in-process when unset
    #[serde(default)]
    pub validator_url: Option<String>,
    #[serde(default)]
    pub generator_timeout_ms: Option<u64>,
    #[serde(default)]
    pub validator_timeout_ms: Option<u64>,
    #[serde(default)]
    pub store_timeout_ms: Option<u64>,
    #[serde(default)]
    pub default_max_attempts: Option<u32>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line or through `HAIKU_PIPELINE_*` variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub generator_url: Option<String>,
    pub store_url: Option<String>,
    pub validator_url: Option<String>,
    pub max_attempts: Option<u32>,
}

/// Fully resolved pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub port: u16,
    pub generator_url: String,
    pub store_url: String,
    pub validator_url: Option<String>,
    pub timeouts: Timeouts,
    pub default_max_attempts: u32,
}

impl PipelineConfig {
    /// Overrides beat TOML, TOML beats compiled defaults
    pub fn resolve(overrides: Overrides, toml: &TomlConfig) -> Self {
        let defaults = Timeouts::default();
        Self {
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            generator_url: overrides
                .generator_url
                .or_else(|| toml.generator_url.clone())
                .unwrap_or_else(|| DEFAULT_GENERATOR_URL.to_string()),
            store_url: overrides
                .store_url
                .or_else(|| toml.store_url.clone())
                .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            validator_url: overrides.validator_url.or_else(|| toml.validator_url.clone()),
            timeouts: Timeouts {
                generator: toml
                    .generator_timeout_ms
                    .map(millis_to_duration)
                    .unwrap_or(defaults.generator),
                validator: toml
                    .validator_timeout_ms
                    .map(millis_to_duration)
                    .unwrap_or(defaults.validator),
                store: toml
                    .store_timeout_ms
                    .map(millis_to_duration)
                    .unwrap_or(defaults.store),
            },
            default_max_attempts: overrides
                .max_attempts
                .or(toml.default_max_attempts)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS)
                .max(1),
        }
    }
}
