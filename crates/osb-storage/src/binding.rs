//! Binding records over the unstructured object store.

use crate::error::{Result, StorageError};
use crate::unstructured::Unstructured;
use crate::watch::{ResourceClient, Watcher, FULL_API_VERSION};
use async_trait::async_trait;
use osb_core::{Binding, Namespace, ResourceKind};
use std::sync::Arc;
use tracing::{debug, error};

/// Persistence interface for binding records.
#[async_trait]
pub trait BindingStorage: Send + Sync {
    /// List all bindings.
    async fn list(&self) -> Result<Vec<Binding>>;

    /// Fetch one binding by name.
    async fn get(&self, name: &str) -> Result<Binding>;

    /// Store a new binding.
    async fn create(&self, binding: Binding) -> Result<Binding>;

    /// Replace an existing binding.
    async fn update(&self, binding: Binding) -> Result<Binding>;

    /// Delete a binding by name.
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Binding storage backed by a watch-based unstructured client.
///
/// `create` and `update` return the submitted binding rather than the
/// object as stored, so store-side defaults such as the resource version are
/// not reflected in the result. `get` and `delete` are not supported.
#[derive(Clone)]
pub struct BindingStore {
    watcher: Arc<dyn Watcher>,
    namespace: Namespace,
}

impl BindingStore {
    /// Create a store scoped to `namespace`.
    #[must_use]
    pub fn new(watcher: Arc<dyn Watcher>, namespace: Namespace) -> Self {
        Self { watcher, namespace }
    }

    /// Namespace the store is scoped to.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn client(&self) -> Arc<dyn ResourceClient> {
        self.watcher
            .resource_client(ResourceKind::ServiceBinding, &self.namespace)
    }

    /// Stamp kind and version, then convert to the stored form.
    fn to_object(binding: &mut Binding) -> Result<Unstructured> {
        binding.kind = ResourceKind::ServiceBinding.kind().to_string();
        binding.api_version = FULL_API_VERSION.to_string();

        let mut object = Unstructured::from_object(&*binding).map_err(|e| {
            error!(name = %binding.name(), error = %e, "failed to convert binding");
            e
        })?;
        object.set_name(binding.name());
        Ok(object)
    }
}

#[async_trait]
impl BindingStorage for BindingStore {
    async fn list(&self) -> Result<Vec<Binding>> {
        let objects = self.client().list().await.map_err(|e| {
            error!(namespace = %self.namespace, error = %e, "failed to list bindings");
            e
        })?;

        objects
            .into_iter()
            .map(|object| {
                object.into_object::<Binding>().map_err(|e| {
                    error!(namespace = %self.namespace, error = %e, "failed to convert object");
                    e
                })
            })
            .collect()
    }

    async fn get(&self, _name: &str) -> Result<Binding> {
        Err(StorageError::NotImplemented { operation: "get" })
    }

    async fn create(&self, mut binding: Binding) -> Result<Binding> {
        let object = Self::to_object(&mut binding)?;

        debug!(name = %binding.name(), namespace = %self.namespace, "creating binding");
        self.client().create(object).await.map_err(|e| {
            error!(
                name = %binding.name(),
                namespace = %self.namespace,
                error = %e,
                "failed to create binding"
            );
            e
        })?;
        Ok(binding)
    }

    async fn update(&self, mut binding: Binding) -> Result<Binding> {
        let object = Self::to_object(&mut binding)?;

        debug!(name = %binding.name(), namespace = %self.namespace, "updating binding");
        self.client().update(object).await.map_err(|e| {
            error!(
                name = %binding.name(),
                namespace = %self.namespace,
                error = %e,
                "failed to update binding"
            );
            e
        })?;
        Ok(binding)
    }

    async fn delete(&self, _name: &str) -> Result<()> {
        Err(StorageError::NotImplemented {
            operation: "delete",
        })
    }
}
