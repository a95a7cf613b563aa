//! Shared types used across the broker bridge.
//!
//! Catalog and request/response envelopes follow the Open Service Broker
//! wire names. Stored records follow the cluster object layout
//! (`kind`/`apiVersion`/`metadata`/`spec`/`status`).

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Plan metadata key naming the chart used to provision instances.
pub const INSTANCE_TYPE_KEY: &str = "instanceType";

/// Plan metadata key naming the chart used to provision bindings.
pub const BINDING_TYPE_KEY: &str = "bindingType";

/// Full catalog returned to the broker API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Services in registry order
    pub services: Vec<Service>,
}

/// A service offered by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Service description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Required platform permissions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// Whether instances of this service can be bound
    #[serde(default)]
    pub bindable: bool,
    /// Whether plan changes are supported
    #[serde(default)]
    pub plan_updateable: bool,
    /// Service-level metadata, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Plans in registry order
    #[serde(default)]
    pub plans: Vec<ServicePlan>,
}

/// A plan of a [`Service`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePlan {
    /// Plan identifier
    pub id: String,
    /// Human readable name
    #[serde(default)]
    pub name: String,
    /// Plan description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Whether the plan is free of charge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
    /// Plan-level bindable override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindable: Option<bool>,
    /// Untyped metadata as published by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Schemas resolved for the plan's artifact types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<Schemas>,
}

impl ServicePlan {
    /// Typed view over the plan metadata.
    ///
    /// Returns `None` when metadata is absent or is not a JSON object.
    #[must_use]
    pub fn metadata_view(&self) -> Option<PlanMetadata<'_>> {
        self.metadata
            .as_ref()
            .and_then(Value::as_object)
            .map(PlanMetadata)
    }
}

/// Read-only typed accessor over plan metadata.
#[derive(Debug, Clone, Copy)]
pub struct PlanMetadata<'a>(&'a Map<String, Value>);

impl<'a> PlanMetadata<'a> {
    /// Look up `key` as a string.
    ///
    /// A missing key and a value of any other JSON type both yield `None`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Whether `key` is present, regardless of its type.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Artifact locators resolved from a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Types {
    /// Chart used to provision instances
    pub instance: String,
    /// Chart used to provision bindings, present iff the plan is bindable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
}

impl Types {
    /// Whether the plan has a binding artifact.
    #[must_use]
    pub fn is_bindable(&self) -> bool {
        self.binding.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Validation schema for one artifact type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Raw schema text
    #[serde(default)]
    pub inputs: String,
}

/// Schemas attached to a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schemas {
    /// Instance provisioning schema
    pub instance: Schema,
    /// Binding schema, only for bindable plans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<Schema>,
}

/// Request to provision a service instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstanceRequest {
    /// Requesting organization
    #[serde(default)]
    pub organization_guid: String,
    /// Plan to provision
    pub plan_id: String,
    /// Service to provision
    pub service_id: String,
    /// Requesting space
    #[serde(default)]
    pub space_guid: String,
    /// Provisioning parameters, forwarded untouched
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    /// Whether the caller accepts asynchronous provisioning
    #[serde(default)]
    pub accepts_incomplete: bool,
}

/// Response to a provisioning request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceInstanceResponse {
    /// Dashboard for the new instance
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dashboard_url: String,
    /// Operation handle for asynchronous provisioning
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operation: String,
}

/// Request to bind an application to an instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingRequest {
    /// Application being bound
    #[serde(default)]
    pub app_guid: String,
    /// Plan of the bound instance
    pub plan_id: String,
    /// Service of the bound instance
    pub service_id: String,
    /// Binding parameters, forwarded untouched
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

/// Response to a binding request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceBindingResponse {
    /// Credentials handed to the bound application
    #[serde(default)]
    pub credentials: Map<String, Value>,
}

/// Object metadata of a stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Unique object name
    #[serde(default)]
    pub name: String,
    /// Owning namespace
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    /// Store-assigned version used for optimistic concurrency
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// Reference to another object in the same namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    /// Referenced object name
    pub name: String,
}

/// Desired state of a binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSpec {
    /// Instance the binding targets
    #[serde(default)]
    pub instance_ref: ObjectReference,
    /// Binding parameters
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    /// Secret that receives the credentials
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_name: String,
    /// Identifier of the binding on the broker side
    #[serde(rename = "osbGuid", default, skip_serializing_if = "String::is_empty")]
    pub osb_guid: String,
}

/// One observed condition of a binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingCondition {
    /// Condition type, e.g. `Ready`
    #[serde(rename = "type")]
    pub condition_type: String,
    /// `True`, `False` or `Unknown`
    pub status: String,
    /// When the status last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
    /// Machine readable reason
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Human readable message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Observed state of a binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingStatus {
    /// Conditions, newest last
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<BindingCondition>,
}

/// Persisted binding record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Object kind, stamped by the store adapter
    #[serde(default)]
    pub kind: String,
    /// API version, stamped by the store adapter
    #[serde(default)]
    pub api_version: String,
    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Desired state
    #[serde(default)]
    pub spec: BindingSpec,
    /// Observed state
    #[serde(default)]
    pub status: BindingStatus,
}

impl Binding {
    /// Create a binding named `name` targeting `instance`.
    #[must_use]
    pub fn new(name: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                ..ObjectMeta::default()
            },
            spec: BindingSpec {
                instance_ref: ObjectReference {
                    name: instance.into(),
                },
                ..BindingSpec::default()
            },
            ..Self::default()
        }
    }

    /// Unique name of the binding.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// Newtype for store namespaces with validation.
///
/// Namespaces must be DNS-1123 labels: lowercase alphanumeric with hyphens,
/// at most 63 characters, starting and ending with an alphanumeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace(String);

impl Namespace {
    /// Create a new `Namespace` from a string.
    ///
    /// # Errors
    /// Returns error if the value is not a DNS-1123 label.
    pub fn new(namespace: impl Into<String>) -> Result<Self, CoreError> {
        let namespace = namespace.into();
        Self::validate(&namespace)?;
        Ok(Self(namespace))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(namespace: &str) -> Result<(), CoreError> {
        static LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = LABEL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("valid regex")
        });

        if namespace.is_empty() || namespace.len() > 63 {
            return Err(CoreError::InvalidNamespace {
                namespace: namespace.to_string(),
                reason: format!("must be 1-63 characters, got {}", namespace.len()),
            });
        }

        if regex.is_match(namespace) {
            Ok(())
        } else {
            Err(CoreError::InvalidNamespace {
                namespace: namespace.to_string(),
                reason: "must be lowercase alphanumeric with hyphens".to_string(),
            })
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
