//! Provisioning delegate.

use crate::error::ReifierError;
use async_trait::async_trait;
use osb_core::{
    BindingRequest, CreateServiceBindingResponse, CreateServiceInstanceResponse,
    ServiceInstanceRequest,
};
use std::path::Path;

/// Turns named resources and staged charts into running cluster workloads.
///
/// The controller only computes names and stages charts; everything that
/// touches the cluster goes through this trait. Implementations must be
/// thread-safe (Send + Sync) so one delegate can serve concurrent requests.
#[async_trait]
pub trait Reifier: Send + Sync {
    /// Install the chart at `chart_path` as the instance `name`.
    ///
    /// `chart_path` is only valid for the duration of the call.
    async fn create_service_instance(
        &self,
        name: &str,
        chart_path: &Path,
        request: &ServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, ReifierError>;

    /// Uninstall the instance `name`.
    async fn remove_service_instance(&self, name: &str) -> Result<(), ReifierError>;

    /// Create a binding against the instance `name` and return its credentials.
    async fn create_service_binding(
        &self,
        name: &str,
        request: &BindingRequest,
    ) -> Result<CreateServiceBindingResponse, ReifierError>;

    /// Remove the binding held by the instance `name`.
    async fn remove_service_binding(&self, name: &str) -> Result<(), ReifierError>;
}
