use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stash_core::constants::DEFAULT_LISTEN_ADDRESS;
use stash_core::{Result, StashError};

/// Daemon configuration, loaded from a TOML file.
///
/// Every field has a default, so an empty file (or no file at all)
/// yields a memory-backed daemon on the default listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the daemon listens on: `tcp://host:port` or `unix://path`.
    pub listen_address: String,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Which storage backend to construct, with its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    Memory,
    Filesystem { root: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable via RUST_LOG.
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            storage: StorageConfig::Memory,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StashError::Io(format!("read config file {} failed: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| StashError::InvalidArgument(format!("invalid config: {e}")))
    }

    /// Render the configuration back to TOML, for `--print-config`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| StashError::Internal(format!("serialize config failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.listen_address, DEFAULT_LISTEN_ADDRESS);
        assert!(matches!(config.storage, StorageConfig::Memory));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_filesystem_backend() {
        let config = Config::from_toml(
            r#"
            listen_address = "unix:///tmp/stash.sock"

            [storage]
            backend = "filesystem"
            root = "/var/lib/stash/blobs"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_address, "unix:///tmp/stash.sock");
        match &config.storage {
            StorageConfig::Filesystem { root } => {
                assert_eq!(root, &PathBuf::from("/var/lib/stash/blobs"));
            }
            other => panic!("expected filesystem backend, got {other:?}"),
        }
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = Config::from_toml(
            r#"
            [storage]
            backend = "tape"
            "#,
        );
        assert!(matches!(result, Err(StashError::InvalidArgument(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config {
            listen_address: "tcp://0.0.0.0:9000".to_string(),
            storage: StorageConfig::Filesystem {
                root: PathBuf::from("/data"),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        };
        let rendered = config.to_toml().unwrap();
        let parsed = Config::from_toml(&rendered).unwrap();
        assert_eq!(parsed.listen_address, config.listen_address);
        assert!(matches!(parsed.storage, StorageConfig::Filesystem { .. }));
        assert_eq!(parsed.logging.level, "warn");
    }
}
