//! Registry-backed lifecycle controller.
//!
//! This module provides the `LifecycleController` which resolves plans to
//! charts, stages them, and forwards every mutation to the configured
//! [`Reifier`] under a deterministic resource name.

use crate::controller::BrokerController;
use crate::error::{ControllerError, ReifierError, Result};
use crate::reifier::Reifier;
use crate::staging::StagedArtifact;
use async_trait::async_trait;
use osb_core::{
    resource_name, AppConfig, BindingRequest, Catalog, CreateServiceBindingResponse,
    CreateServiceInstanceResponse, ResourceKind, ServiceInstanceRequest, StagingConfig,
};
use osb_registry::{BlobClient, CatalogResolver, ServiceRegistry};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Broker controller that provisions through a [`Reifier`].
pub struct LifecycleController {
    /// Registry access and schema enrichment
    resolver: CatalogResolver,
    /// Provisioning delegate
    reifier: Arc<dyn Reifier>,
    /// Where staged charts are written
    staging: StagingConfig,
}

impl LifecycleController {
    /// Create a controller over a catalog resolver and delegate.
    #[must_use]
    pub fn new(resolver: CatalogResolver, reifier: Arc<dyn Reifier>) -> Self {
        Self {
            resolver,
            reifier,
            staging: StagingConfig::default(),
        }
    }

    /// Create a controller over `registry`, taking blob and staging
    /// settings from `config`.
    ///
    /// # Errors
    /// Returns error if the blob client cannot be created.
    pub fn from_config(
        config: &AppConfig,
        registry: Arc<dyn ServiceRegistry>,
        reifier: Arc<dyn Reifier>,
    ) -> Result<Self> {
        let blobs = BlobClient::new(&config.blob)?;

        Ok(Self::new(CatalogResolver::new(registry, blobs), reifier)
            .with_staging(config.staging.clone()))
    }

    /// Set where staged charts are written.
    #[must_use]
    pub fn with_staging(mut self, staging: StagingConfig) -> Self {
        self.staging = staging;
        self
    }

    fn delegate_error(resource: &str, source: ReifierError) -> ControllerError {
        ControllerError::Delegate {
            resource: resource.to_string(),
            source,
        }
    }
}

#[async_trait]
impl BrokerController for LifecycleController {
    async fn catalog(&self) -> Result<Catalog> {
        Ok(self.resolver.catalog().await?)
    }

    async fn get_service_instance(&self, instance_id: &str) -> Result<String> {
        warn!(instance_id, "get_service_instance is not supported");
        Err(ControllerError::NotImplemented {
            operation: "get_service_instance",
        })
    }

    async fn create_service_instance(
        &self,
        instance_id: &str,
        request: &ServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse> {
        let types = self
            .resolver
            .plan_types(&request.service_id, &request.plan_id)
            .await
            .map_err(|e| {
                error!(
                    service_id = %request.service_id,
                    plan_id = %request.plan_id,
                    error = %e,
                    "can't find a type for service plan"
                );
                e
            })?;

        // Dropped at the end of this call, removing the chart from disk.
        let chart = StagedArtifact::fetch(self.resolver.blobs(), &types.instance, &self.staging)
            .await
            .map_err(|e| {
                error!(locator = %types.instance, error = %e, "failed to fetch chart");
                e
            })?;

        let instance_name = resource_name(instance_id, ResourceKind::ServiceInstance);

        let response = self
            .reifier
            .create_service_instance(&instance_name, chart.path(), request)
            .await
            .map_err(|e| {
                error!(
                    instance_id,
                    chart = %types.instance,
                    error = %e,
                    "failed to create service instance"
                );
                Self::delegate_error(&instance_name, e)
            })?;

        info!(
            instance_id,
            instance_name = %instance_name,
            chart = %chart.locator(),
            chart_bytes = chart.size(),
            "created service instance"
        );
        Ok(response)
    }

    async fn remove_service_instance(&self, instance_id: &str) -> Result<()> {
        let instance_name = resource_name(instance_id, ResourceKind::ServiceInstance);

        self.reifier
            .remove_service_instance(&instance_name)
            .await
            .map_err(|e| {
                error!(instance_id, error = %e, "failed to remove service instance");
                Self::delegate_error(&instance_name, e)
            })?;

        info!(instance_id, instance_name = %instance_name, "removed service instance");
        Ok(())
    }

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        request: &BindingRequest,
    ) -> Result<CreateServiceBindingResponse> {
        let instance_name = resource_name(instance_id, ResourceKind::ServiceInstance);

        let binding = self
            .reifier
            .create_service_binding(&instance_name, request)
            .await
            .map_err(|e| {
                error!(instance_id, binding_id, error = %e, "failed to create service binding");
                Self::delegate_error(&instance_name, e)
            })?;

        info!(instance_id, binding_id, "created service binding");
        Ok(binding)
    }

    async fn unbind(&self, instance_id: &str, binding_id: &str) -> Result<()> {
        let instance_name = resource_name(instance_id, ResourceKind::ServiceInstance);
        let binding_name = resource_name(binding_id, ResourceKind::ServiceBinding);

        self.reifier
            .remove_service_binding(&instance_name)
            .await
            .map_err(|e| {
                error!(instance_id, binding_id, error = %e, "failed to remove binding");
                Self::delegate_error(&instance_name, e)
            })?;

        // The proxy is best-effort cleanup; the binding itself is already gone.
        if let Err(e) = self.reifier.remove_service_instance(&binding_name).await {
            warn!(
                binding_id,
                proxy = %binding_name,
                error = %e,
                "cannot remove proxy for binding"
            );
        }

        info!(instance_id, binding_id, "removed service binding");
        Ok(())
    }
}
