//! haiku-store configuration
//!
//! TOML bootstrap merged under command-line/environment overrides.

use haiku_common::config::{default_data_dir, LoggingConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::PoolSettings;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8075;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line or through `HAIKU_STORE_*` variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
}

/// Fully resolved store settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub pool: PoolSettings,
}

impl StoreConfig {
    /// Overrides beat TOML, TOML beats compiled defaults
    pub fn resolve(overrides: Overrides, toml: &TomlConfig) -> Self {
        let defaults = PoolSettings::default();
        Self {
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            database_path: overrides
                .database_path
                .or_else(|| toml.database_path.clone())
                .unwrap_or_else(|| default_data_dir().join("haikus.db")),
            pool: PoolSettings {
                max_connections: toml.max_connections.unwrap_or(defaults.max_connections),
                busy_timeout: toml
                    .busy_timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.busy_timeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::resolve(Overrides::default(), &TomlConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_path.ends_with("haikus.db"));
        assert_eq!(config.pool.max_connections, 8);
    }

    #[test]
    fn test_toml_beats_defaults() {
        let toml: TomlConfig = toml::from_str(
            "port = 9100\ndatabase_path = \"/tmp/h.db\"\nmax_connections = 2\nbusy_timeout_ms = 250",
        )
        .unwrap();
        let config = StoreConfig::resolve(Overrides::default(), &toml);
        assert_eq!(config.port, 9100);
        assert_eq!(config.database_path, PathBuf::from("/tmp/h.db"));
        assert_eq!(config.pool.max_connections, 2);
        assert_eq!(config.pool.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_overrides_beat_toml() {
        let toml: TomlConfig = toml::from_str("port = 9100\ndatabase_path = \"/tmp/h.db\"").unwrap();
        let overrides = Overrides {
            port: Some(9200),
            database_path: Some(PathBuf::from("/srv/haikus.db")),
        };
        let config = StoreConfig::resolve(overrides, &toml);
        assert_eq!(config.port, 9200);
        assert_eq!(config.database_path, PathBuf::from("/srv/haikus.db"));
    }
}
