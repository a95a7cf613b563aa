//! Service registry clients.

use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use osb_core::{RegistryConfig, Service};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Source of service and plan metadata.
///
/// Implementations should be thread-safe (Send + Sync) so a single registry
/// can back both the catalog resolver and the lifecycle controller.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Fetch every service, in registry order.
    async fn services(&self) -> Result<Vec<Service>>;

    /// Fetch a single service by ID.
    async fn service(&self, service_id: &str) -> Result<Service>;
}

/// Registry reached over its HTTP API.
///
/// Uses `GET {base}/services` for the catalog and `GET {base}/services/{id}`
/// for single services. Service IDs are percent-encoded as one path segment.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: Client,
    base_url: String,
}

impl HttpRegistry {
    /// Create a registry client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        Self::with_base_url(config.base_url(), Duration::from_secs(config.timeout_secs))
    }

    /// Create a registry client for an explicit base URL.
    ///
    /// # Errors
    /// Returns error if the base URL is not an absolute HTTP(S) URL or the
    /// HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let registry = Self { client, base_url };
        registry.endpoint(&[])?;
        Ok(registry)
    }

    /// Base URL of the registry API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `segments` below the base, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| RegistryError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_object<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "fetching from service registry");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| RegistryError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ServiceRegistry for HttpRegistry {
    async fn services(&self) -> Result<Vec<Service>> {
        let url = self.endpoint(&["services"])?;
        self.fetch_object(url).await
    }

    async fn service(&self, service_id: &str) -> Result<Service> {
        let url = self.endpoint(&["services", service_id])?;
        match self.fetch_object(url).await {
            Err(RegistryError::Fetch { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(RegistryError::ServiceNotFound {
                    service_id: service_id.to_string(),
                })
            }
            other => other,
        }
    }
}

/// In-memory registry holding a fixed list of services.
///
/// Useful for local runs and tests where no registry process is available.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    services: Arc<Vec<Service>>,
}

impl StaticRegistry {
    /// Create a registry serving `services` in the given order.
    #[must_use]
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}

#[async_trait]
impl ServiceRegistry for StaticRegistry {
    async fn services(&self) -> Result<Vec<Service>> {
        Ok(self.services.as_ref().clone())
    }

    async fn service(&self, service_id: &str) -> Result<Service> {
        self.services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or_else(|| RegistryError::ServiceNotFound {
                service_id: service_id.to_string(),
            })
    }
}
