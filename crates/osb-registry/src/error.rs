//! Error types for the registry subsystem.

use thiserror::Error;

/// Errors that can occur while resolving the catalog.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Service not known to the registry
    #[error("service not found: {service_id}")]
    ServiceNotFound {
        /// The service ID that was not found
        service_id: String,
    },

    /// Service exists but has no plan with the requested ID
    #[error("did not find plan {plan_id} in service {service_id}")]
    PlanNotFound {
        /// Owning service
        service_id: String,
        /// The plan ID that was not found
        plan_id: String,
    },

    /// Plan metadata does not name a usable instance type
    #[error("did not find usable types for plan {plan_id}")]
    NoUsableTypes {
        /// Plan whose metadata is unusable
        plan_id: String,
    },

    /// Artifact locator does not use the `gs://` scheme
    #[error("invalid locator '{locator}': gs://... is required")]
    InvalidLocator {
        /// Rejected locator
        locator: String,
    },

    /// Registry base URL cannot carry API paths
    #[error("invalid registry URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Configured base URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// HTTP request returned a non-success status
    #[error("fetch of {url} failed: status {status}")]
    Fetch {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body could not be decoded
    #[error("failed to parse response from {url}: {message}")]
    Parse {
        /// Requested URL
        url: String,
        /// Decoder message
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error while writing a downloaded artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// Whether the error means a service, plan or type is missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ServiceNotFound { .. } | Self::PlanNotFound { .. } | Self::NoUsableTypes { .. }
        )
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::InvalidLocator {
            locator: "s3://bucket/chart".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid locator 's3://bucket/chart': gs://... is required"
        );

        let err = RegistryError::PlanNotFound {
            service_id: "svc".to_string(),
            plan_id: "p9".to_string(),
        };
        assert_eq!(err.to_string(), "did not find plan p9 in service svc");
    }

    #[test]
    fn test_classification() {
        let err = RegistryError::NoUsableTypes {
            plan_id: "p".to_string(),
        };
        assert!(err.is_not_found());

        let err = RegistryError::Fetch {
            url: "https://example.com".to_string(),
            status: 500,
        };
        assert!(!err.is_not_found());
    }
}
