//! Error types for the storage subsystem.

use thiserror::Error;

/// Errors that can occur in object store operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Typed record could not be translated to or from its unstructured form
    #[error("failed to convert object: {0}")]
    Conversion(#[from] serde_json::Error),

    /// Unstructured value is not a JSON object
    #[error("failed to convert object: expected a JSON object, got {found}")]
    NotAnObject {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// Object store rejected or failed the call
    #[error("object store {operation} failed for {name}: {reason}")]
    Store {
        /// Store operation
        operation: &'static str,
        /// Object name
        name: String,
        /// Reason for the failure
        reason: String,
    },

    /// Object with the same name already exists
    #[error("{kind} {name} already exists")]
    AlreadyExists {
        /// Object kind
        kind: String,
        /// Object name
        name: String,
    },

    /// Object does not exist
    #[error("{kind} {name} not found")]
    NotFound {
        /// Object kind
        kind: String,
        /// Object name
        name: String,
    },

    /// Operation is declared but not supported by this adapter
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// Operation name
        operation: &'static str,
    },
}

impl StorageError {
    /// Whether the error comes from representation translation.
    #[must_use]
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion(_) | Self::NotAnObject { .. })
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
