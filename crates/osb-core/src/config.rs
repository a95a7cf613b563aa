//! Configuration management for the broker bridge.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Namespace;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/osb-bridge/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service registry endpoint
    pub registry: RegistryConfig,
    /// Chart and schema blob storage
    pub blob: BlobConfig,
    /// Cluster object store scoping
    pub storage: StorageConfig,
    /// Staged artifact handling
    pub staging: StagingConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults
    /// if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `OSB_REGISTRY_HOST`: Override registry host
    /// - `OSB_REGISTRY_PORT`: Override registry port
    /// - `OSB_NAMESPACE`: Override store namespace
    /// - `OSB_BLOB_BASE_URL`: Override the HTTPS base used for `gs://` locators
    pub fn with_env(mut self) -> ConfigResult<Self> {
        if let Ok(host) = std::env::var("OSB_REGISTRY_HOST") {
            tracing::debug!("Override registry.host from env: {}", host);
            self.registry.host = host;
        }

        if let Ok(val) = std::env::var("OSB_REGISTRY_PORT") {
            if let Ok(port) = val.parse() {
                self.registry.port = port;
                tracing::debug!("Override registry.port from env: {}", port);
            }
        }

        if let Ok(namespace) = std::env::var("OSB_NAMESPACE") {
            tracing::debug!("Override storage.namespace from env: {}", namespace);
            self.storage.namespace = namespace;
        }

        if let Ok(base_url) = std::env::var("OSB_BLOB_BASE_URL") {
            tracing::debug!("Override blob.base_url from env: {}", base_url);
            self.blob.base_url = base_url;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check values that cannot be expressed in the type system.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.registry.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "registry.port".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }

        if !self.blob.base_url.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "blob.base_url".to_string(),
                reason: format!("must end with '/', got '{}'", self.blob.base_url),
            });
        }

        self.storage.namespace()?;
        Ok(())
    }

    /// Save configuration to `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/osb-bridge/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "osb", "osb-bridge").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Service registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry host name
    pub host: String,
    /// Registry port
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Base URL of the registry API.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            timeout_secs: 30,
        }
    }
}

/// Blob storage settings for charts and their schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// HTTPS base that replaces the `gs://` scheme
    pub base_url: String,
    /// Suffix of the schema sidecar object
    pub schema_suffix: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: "https://storage.googleapis.com/".to_string(),
            schema_suffix: ".schema".to_string(),
        }
    }
}

/// Cluster object store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Namespace holding binding records
    pub namespace: String,
}

impl StorageConfig {
    /// Validated namespace.
    pub fn namespace(&self) -> ConfigResult<Namespace> {
        Namespace::new(self.namespace.clone()).map_err(|e| ConfigError::InvalidValue {
            field: "storage.namespace".to_string(),
            reason: e.to_string(),
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
        }
    }
}

/// Staged artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// File name prefix of staged charts
    pub prefix: String,
    /// Directory for staged charts (system temp dir when unset)
    pub dir: Option<PathBuf>,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            prefix: "chart-".to_string(),
            dir: None,
        }
    }
}
