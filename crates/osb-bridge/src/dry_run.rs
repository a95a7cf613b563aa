//! Reifier that records what it would provision instead of touching a cluster.

use async_trait::async_trait;
use osb_controller::{Reifier, ReifierError};
use osb_core::{
    BindingRequest, CreateServiceBindingResponse, CreateServiceInstanceResponse,
    ServiceInstanceRequest,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// One delegate call observed during a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Delegate operation
    pub operation: &'static str,
    /// Resource name handed to the delegate
    pub name: String,
    /// Size of the staged chart, for installs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_bytes: Option<u64>,
}

/// Delegate that accepts every call and keeps a log of them.
#[derive(Debug, Default)]
pub struct DryRunReifier {
    actions: Mutex<Vec<Action>>,
}

impl DryRunReifier {
    /// Calls seen so far, oldest first.
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().expect("acquire lock on actions").clone()
    }

    fn record(&self, operation: &'static str, name: &str, chart_bytes: Option<u64>) {
        info!(operation, name, ?chart_bytes, "dry run");
        self.actions
            .lock()
            .expect("acquire lock on actions")
            .push(Action {
                operation,
                name: name.to_string(),
                chart_bytes,
            });
    }
}

#[async_trait]
impl Reifier for DryRunReifier {
    async fn create_service_instance(
        &self,
        name: &str,
        chart_path: &Path,
        _request: &ServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, ReifierError> {
        let metadata = tokio::fs::metadata(chart_path)
            .await
            .map_err(|e| ReifierError::Other(Box::new(e)))?;

        self.record("create_service_instance", name, Some(metadata.len()));
        Ok(CreateServiceInstanceResponse::default())
    }

    async fn remove_service_instance(&self, name: &str) -> Result<(), ReifierError> {
        self.record("remove_service_instance", name, None);
        Ok(())
    }

    async fn create_service_binding(
        &self,
        name: &str,
        _request: &BindingRequest,
    ) -> Result<CreateServiceBindingResponse, ReifierError> {
        self.record("create_service_binding", name, None);
        Ok(CreateServiceBindingResponse::default())
    }

    async fn remove_service_binding(&self, name: &str) -> Result<(), ReifierError> {
        self.record("remove_service_binding", name, None);
        Ok(())
    }
}
