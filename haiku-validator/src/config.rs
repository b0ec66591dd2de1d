//! haiku-validator configuration

use haiku_common::config::LoggingConfig;
use serde::Deserialize;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8001;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Command-line/environment port beats TOML, TOML beats the default
    pub fn resolve_port(&self, cli_port: Option<u16>) -> u16 {
        cli_port.or(self.port).unwrap_or(DEFAULT_PORT)
    }
}
