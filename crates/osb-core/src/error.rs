//! Core error types for the broker bridge.
//!
//! Subsystem crates define their own error enums; this module only covers
//! failures that originate in the shared model and configuration.

use thiserror::Error;

/// Errors raised by the shared data model.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Namespace is not a valid DNS-1123 label
    #[error("invalid namespace '{namespace}': {reason}")]
    InvalidNamespace {
        /// Rejected namespace
        namespace: String,
        /// Why it was rejected
        reason: String,
    },

    /// Resource kind name is not one of the known kinds
    #[error("unknown resource kind: {0}")]
    UnknownResourceKind(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnknownResourceKind("proxy".to_string());
        assert_eq!(err.to_string(), "unknown resource kind: proxy");

        let err = ConfigError::InvalidValue {
            field: "registry.port".to_string(),
            reason: "must be non-zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for registry.port: must be non-zero"
        );
    }

    #[test]
    fn test_error_from_config() {
        let core_err: CoreError = ConfigError::NoConfigDir.into();
        assert!(matches!(core_err, CoreError::Config(_)));
    }
}
