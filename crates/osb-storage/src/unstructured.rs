//! Generic object representation used by the store.
//!
//! An [`Unstructured`] is the JSON form of any stored record. Only
//! `kind`, `apiVersion` and `metadata.{name,namespace,resourceVersion}` are
//! interpreted; everything else is carried opaquely.

use crate::error::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped cluster object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unstructured(Map<String, Value>);

impl Unstructured {
    /// Convert a typed record into its unstructured form.
    pub fn from_object<T: Serialize>(object: &T) -> Result<Self> {
        Self::try_from(serde_json::to_value(object)?)
    }

    /// Convert back into a typed record.
    pub fn into_object<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.0))?)
    }

    /// Object kind.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    /// API version.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    /// Object name from `metadata.name`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    /// Set `metadata.name`, creating `metadata` if needed.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_metadata_str("name", name.into());
    }

    /// Object namespace from `metadata.namespace`.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    /// Set `metadata.namespace`, creating `metadata` if needed.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.set_metadata_str("namespace", namespace.into());
    }

    /// Store-assigned version from `metadata.resourceVersion`.
    #[must_use]
    pub fn resource_version(&self) -> Option<&str> {
        self.metadata_str("resourceVersion")
    }

    /// Set `metadata.resourceVersion`.
    pub fn set_resource_version(&mut self, version: impl Into<String>) {
        self.set_metadata_str("resourceVersion", version.into());
    }

    /// Borrow the underlying JSON map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(Value::as_object)
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
    }

    fn set_metadata_str(&mut self, key: &str, value: String) {
        let metadata = self
            .0
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));

        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }
        if let Value::Object(map) = metadata {
            map.insert(key.to_string(), Value::String(value));
        }
    }
}

impl TryFrom<Value> for Unstructured {
    type Error = StorageError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(StorageError::NotAnObject { found: "null" }),
            Value::Bool(_) => Err(StorageError::NotAnObject { found: "boolean" }),
            Value::Number(_) => Err(StorageError::NotAnObject { found: "number" }),
            Value::String(_) => Err(StorageError::NotAnObject { found: "string" }),
            Value::Array(_) => Err(StorageError::NotAnObject { found: "array" }),
        }
    }
}

impl From<Unstructured> for Value {
    fn from(object: Unstructured) -> Self {
        Value::Object(object.0)
    }
}
