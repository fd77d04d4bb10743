use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use biblio_core::DEFAULT_NAMESPACE;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "biblio.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no connection string: pass --conn, set `connection` in the config, or set DATABASE_URL")]
    MissingConnection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiblioConfig {
    pub connection: Option<String>,
    pub namespace: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for BiblioConfig {
    fn default() -> Self {
        Self {
            connection: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl BiblioConfig {
    /// Load `path`, or `biblio.toml` if present, or defaults.
    ///
    /// An explicitly passed path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Toml { path, source })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Flag, then config file, then `env_url` (normally `DATABASE_URL`).
    pub fn resolve_connection(
        &self,
        flag: Option<String>,
        env_url: Option<String>,
    ) -> Result<String, ConfigError> {
        flag.or_else(|| self.connection.clone())
            .or(env_url)
            .ok_or(ConfigError::MissingConnection)
    }
}
