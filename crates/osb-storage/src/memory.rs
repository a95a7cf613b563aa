//! In-memory object store.

use crate::error::{Result, StorageError};
use crate::unstructured::Unstructured;
use crate::watch::{ResourceClient, Watcher};
use async_trait::async_trait;
use osb_core::{Namespace, ResourceKind};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

type Collection = BTreeMap<String, Unstructured>;

#[derive(Debug, Default)]
struct Objects {
    collections: RwLock<HashMap<(ResourceKind, String), Collection>>,
    version: AtomicU64,
}

impl Objects {
    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

/// Object store kept in process memory.
///
/// Clients handed out for the same kind and namespace share state. Objects
/// are listed in name order.
#[derive(Debug, Clone, Default)]
pub struct MemoryWatcher {
    objects: Arc<Objects>,
}

impl MemoryWatcher {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Watcher for MemoryWatcher {
    fn resource_client(
        &self,
        kind: ResourceKind,
        namespace: &Namespace,
    ) -> Arc<dyn ResourceClient> {
        Arc::new(MemoryResourceClient {
            objects: Arc::clone(&self.objects),
            kind,
            namespace: namespace.as_str().to_string(),
        })
    }
}

struct MemoryResourceClient {
    objects: Arc<Objects>,
    kind: ResourceKind,
    namespace: String,
}

impl MemoryResourceClient {
    fn key(&self) -> (ResourceKind, String) {
        (self.kind, self.namespace.clone())
    }

    fn require_name(&self, object: &Unstructured, operation: &'static str) -> Result<String> {
        match object.name() {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(StorageError::Store {
                operation,
                name: String::new(),
                reason: format!("{} object has no metadata.name", self.kind),
            }),
        }
    }

    fn not_found(&self, name: &str) -> StorageError {
        StorageError::NotFound {
            kind: self.kind.kind().to_string(),
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl ResourceClient for MemoryResourceClient {
    async fn create(&self, mut object: Unstructured) -> Result<Unstructured> {
        let name = self.require_name(&object, "create")?;
        let mut collections = self
            .objects
            .collections
            .write()
            .expect("acquire write lock on objects");

        let collection = collections.entry(self.key()).or_default();
        if collection.contains_key(&name) {
            return Err(StorageError::AlreadyExists {
                kind: self.kind.kind().to_string(),
                name,
            });
        }

        object.set_namespace(self.namespace.clone());
        object.set_resource_version(self.objects.next_version());
        collection.insert(name.clone(), object.clone());

        debug!(kind = %self.kind, namespace = %self.namespace, name, "created object");
        Ok(object)
    }

    async fn update(&self, mut object: Unstructured) -> Result<Unstructured> {
        let name = self.require_name(&object, "update")?;
        let mut collections = self
            .objects
            .collections
            .write()
            .expect("acquire write lock on objects");

        let existing = collections
            .get_mut(&self.key())
            .and_then(|c| c.get_mut(&name))
            .ok_or_else(|| self.not_found(&name))?;

        object.set_namespace(self.namespace.clone());
        object.set_resource_version(self.objects.next_version());
        *existing = object.clone();

        debug!(kind = %self.kind, namespace = %self.namespace, name, "updated object");
        Ok(object)
    }

    async fn list(&self) -> Result<Vec<Unstructured>> {
        let collections = self
            .objects
            .collections
            .read()
            .expect("acquire read lock on objects");

        Ok(collections
            .get(&self.key())
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, name: &str) -> Result<Unstructured> {
        let collections = self
            .objects
            .collections
            .read()
            .expect("acquire read lock on objects");

        collections
            .get(&self.key())
            .and_then(|c| c.get(name))
            .cloned()
            .ok_or_else(|| self.not_found(name))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut collections = self
            .objects
            .collections
            .write()
            .expect("acquire write lock on objects");

        collections
            .get_mut(&self.key())
            .and_then(|c| c.remove(name))
            .map(|_| ())
            .ok_or_else(|| self.not_found(name))
    }
}
