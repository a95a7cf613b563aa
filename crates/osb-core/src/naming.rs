//! Deterministic cluster resource names.
//!
//! Broker identifiers are usually UUIDs. Cluster object names are derived by
//! stripping every hyphen and applying a per-kind template, so the same
//! identifier always maps to the same name. Identifiers that differ only in
//! hyphen placement collide.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const INSTANCE_PREFIX: &str = "cf-i-";
const BINDING_PREFIX: &str = "cf-b-";

/// Kind of cluster resource managed by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A provisioned service instance
    ServiceInstance,
    /// A binding between an application and a service instance
    ServiceBinding,
}

impl ResourceKind {
    /// Object kind recorded on stored resources.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::ServiceInstance => "ServiceInstance",
            Self::ServiceBinding => "ServiceBinding",
        }
    }

    /// Plural collection name used by the object store.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::ServiceInstance => "serviceinstances",
            Self::ServiceBinding => "servicebindings",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::ServiceInstance => INSTANCE_PREFIX,
            Self::ServiceBinding => BINDING_PREFIX,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instance" | "serviceinstance" | "service_instance" => Ok(Self::ServiceInstance),
            "binding" | "servicebinding" | "service_binding" => Ok(Self::ServiceBinding),
            _ => Err(CoreError::UnknownResourceKind(s.to_string())),
        }
    }
}

/// Convert a broker identifier into the cluster name for `kind`.
#[must_use]
pub fn resource_name(id: &str, kind: ResourceKind) -> String {
    let clean: String = id.chars().filter(|c| *c != '-').collect();
    format!("{}{clean}", kind.prefix())
}
