//! Watch-based object store client interface.

use crate::error::Result;
use crate::unstructured::Unstructured;
use async_trait::async_trait;
use osb_core::{Namespace, ResourceKind};
use std::sync::Arc;

/// `group/version` of the broker resources, stamped on stored objects.
pub const FULL_API_VERSION: &str = "catalog.k8s.io/v1alpha1";

/// CRUD client for one resource kind in one namespace.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Create a new object. Fails if the name is taken.
    async fn create(&self, object: Unstructured) -> Result<Unstructured>;

    /// Replace an existing object.
    async fn update(&self, object: Unstructured) -> Result<Unstructured>;

    /// List every object of the kind in the namespace.
    async fn list(&self) -> Result<Vec<Unstructured>>;

    /// Fetch one object by name.
    async fn get(&self, name: &str) -> Result<Unstructured>;

    /// Delete one object by name.
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Hands out resource clients keyed by kind and namespace.
pub trait Watcher: Send + Sync {
    /// Client for `kind` objects in `namespace`.
    fn resource_client(&self, kind: ResourceKind, namespace: &Namespace)
        -> Arc<dyn ResourceClient>;
}

