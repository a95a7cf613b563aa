//! Broker-facing controller surface.

use crate::error::Result;
use async_trait::async_trait;
use osb_core::{
    BindingRequest, Catalog, CreateServiceBindingResponse, CreateServiceInstanceResponse,
    ServiceInstanceRequest,
};

/// Operations the broker API transport dispatches to.
///
/// The transport owns routing, encoding and authentication; implementations
/// only see decoded requests.
#[async_trait]
pub trait BrokerController: Send + Sync {
    /// Full catalog with schemas attached to every plan.
    async fn catalog(&self) -> Result<Catalog>;

    /// Look up a provisioned instance.
    async fn get_service_instance(&self, instance_id: &str) -> Result<String>;

    /// Provision a new instance.
    async fn create_service_instance(
        &self,
        instance_id: &str,
        request: &ServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse>;

    /// Deprovision an instance.
    async fn remove_service_instance(&self, instance_id: &str) -> Result<()>;

    /// Bind an application to an instance.
    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        request: &BindingRequest,
    ) -> Result<CreateServiceBindingResponse>;

    /// Remove a binding.
    async fn unbind(&self, instance_id: &str, binding_id: &str) -> Result<()>;
}
