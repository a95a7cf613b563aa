//! Error types for the controller subsystem.

use osb_registry::RegistryError;
use thiserror::Error;

/// Errors that can occur in broker lifecycle operations.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Plan, type, schema or chart resolution failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The provisioning delegate failed
    #[error("delegate failed for {resource}: {source}")]
    Delegate {
        /// Resource name handed to the delegate
        resource: String,
        /// Delegate error
        #[source]
        source: ReifierError,
    },

    /// The chart could not be staged on local disk
    #[error("failed to stage chart {locator}: {source}")]
    Staging {
        /// Chart locator
        locator: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Operation is declared by the broker API but not supported
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// Operation name
        operation: &'static str,
    },
}

/// Errors reported by a [`Reifier`](crate::Reifier).
#[derive(Error, Debug)]
pub enum ReifierError {
    /// The named resource does not exist in the cluster
    #[error("resource not found: {name}")]
    NotFound {
        /// Resource name
        name: String,
    },

    /// The delegate rejected or failed the operation
    #[error("{operation} failed for {name}: {reason}")]
    Failed {
        /// Operation that failed
        operation: String,
        /// Resource name
        name: String,
        /// Reason for the failure
        reason: String,
    },

    /// Any other delegate-specific failure
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
